pub mod fsim;
