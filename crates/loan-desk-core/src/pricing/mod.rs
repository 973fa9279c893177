pub mod collateral;
pub mod pricer;
