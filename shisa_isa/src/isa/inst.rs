use super::opcode::Opcode;
use super::RawInst;

/// A single encoded ShISA instruction.
///
/// The word packs four equally sized fields, most significant first:
///
/// ```text
///  15      12 11       8 7        4 3        0
/// +----------+----------+----------+----------+
/// |  opcode  |   dst    |   srcL   |   srcR   |
/// +----------+----------+----------+----------+
/// ```
///
/// There is no immediate field; `r0` and `r1` read as the constants 0 and 1,
/// so programs synthesize every other value from those.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct Inst(RawInst);

const FIELD_MASK: RawInst = 0xF;

const OPCODE_SHIFT: u32 = 12;
const DST_SHIFT: u32 = 8;
const SRC_L_SHIFT: u32 = 4;
const SRC_R_SHIFT: u32 = 0;

impl Inst {
    /// Pack an instruction word. Register operands are masked to four bits.
    pub fn encode(op: Opcode, dst: usize, src_l: usize, src_r: usize) -> Inst {
        let word = (op as RawInst & FIELD_MASK) << OPCODE_SHIFT
            | (dst as RawInst & FIELD_MASK) << DST_SHIFT
            | (src_l as RawInst & FIELD_MASK) << SRC_L_SHIFT
            | (src_r as RawInst & FIELD_MASK) << SRC_R_SHIFT;

        Inst(word)
    }

    /// Unpack the word into its fields. Total: every nibble is an opcode.
    pub fn decode(self) -> Decoded {
        Decoded {
            op: Opcode::from_nibble((self.0 >> OPCODE_SHIFT) as u8),
            dst: ((self.0 >> DST_SHIFT) & FIELD_MASK) as usize,
            src_l: ((self.0 >> SRC_L_SHIFT) & FIELD_MASK) as usize,
            src_r: ((self.0 >> SRC_R_SHIFT) & FIELD_MASK) as usize,
        }
    }

    pub fn raw(self) -> RawInst {
        self.0
    }
}

impl From<RawInst> for Inst {
    fn from(word: RawInst) -> Inst {
        Inst(word)
    }
}

/// An instruction word unpacked into `(opcode, dst, srcL, srcR)`.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct Decoded {
    pub op: Opcode,
    pub dst: usize,
    pub src_l: usize,
    pub src_r: usize,
}
