pub mod proximity;
