pub mod axis;
pub mod entries;
pub mod histo1d;
pub mod histo2d;
