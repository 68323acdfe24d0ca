use shisa_isa::isa::{Addr, Binary, Cell, CELLS_PER_DATA, CELLS_PER_INST};

/// Flat byte-addressable memory covering the whole address space.
pub struct Ram {
    cells: [Cell; Ram::SIZE],
}

impl Ram {
    /// One cell per address: a 16-bit address space holds 65536 cells.
    pub const SIZE: usize = Addr::MAX as usize + 1;

    pub fn new() -> Ram {
        Ram {
            cells: [0; Ram::SIZE],
        }
    }

    pub fn read(&self, addr: Addr) -> Cell {
        self.cells[addr as usize]
    }

    pub fn write(&mut self, addr: Addr, data: Cell) {
        self.cells[addr as usize] = data;
    }
}

impl Default for Ram {
    fn default() -> Ram {
        Ram::new()
    }
}

/// Owns the RAM and the layout of the loaded binary.
///
/// The image is laid out data first, then program text, so that code
/// addresses baked into data words stay fixed offsets from `data_end`:
///
/// ```text
/// [0, data_end)                      data words, most significant cell first
/// [data_end, bin_end)                instruction words, same packing
/// [bin_end, bin_end + STACK_OFFSET)  stack
/// ```
///
/// Program text is immutable: writes into `[data_end, bin_end)` are dropped
/// at this boundary rather than raising, since generated code may
/// legitimately target such addresses. Data and stack writes go through.
pub struct RamController {
    ram: Ram,

    binary_loaded: bool,
    data_end: Addr,
    bin_end: Addr,
}

impl RamController {
    pub fn new() -> RamController {
        RamController {
            ram: Ram::new(),
            binary_loaded: false,
            data_end: 0,
            bin_end: 0,
        }
    }

    /// Lay out `bin` in memory and record the region boundaries.
    pub fn load_bin(&mut self, bin: &Binary) {
        let mut curr: usize = 0;

        for &data in bin.data() {
            for i in (0..CELLS_PER_DATA).rev() {
                self.ram.write(curr as Addr, (data >> (i as u32 * Cell::BITS)) as Cell);
                curr += 1;
            }
        }
        self.data_end = curr as Addr;

        for inst in bin.module().iter() {
            let raw = inst.raw();
            for i in (0..CELLS_PER_INST).rev() {
                self.ram.write(curr as Addr, (raw >> (i as u32 * Cell::BITS)) as Cell);
                curr += 1;
            }
        }
        self.bin_end = curr as Addr;

        self.binary_loaded = true;
    }

    pub fn read(&self, addr: Addr) -> Cell {
        self.ram.read(addr)
    }

    /// Write a cell, unless `addr` falls inside the program text.
    pub fn write(&mut self, addr: Addr, data: Cell) {
        if addr >= self.data_end && addr < self.bin_end {
            return;
        }
        self.ram.write(addr, data);
    }

    /// Address of the first instruction; equal to `data_end`.
    pub fn program_start(&self) -> Addr {
        self.data_end
    }

    /// One past the last instruction; equal to `bin_end`.
    pub fn program_end(&self) -> Addr {
        self.bin_end
    }

    pub fn bin_end(&self) -> Addr {
        self.bin_end
    }

    /// Address of the first data word. Data always starts the image.
    pub fn bin_data_addr(&self) -> Addr {
        0x0000
    }

    pub fn is_binary_loaded(&self) -> bool {
        self.binary_loaded
    }
}

impl Default for RamController {
    fn default() -> RamController {
        RamController::new()
    }
}
