mod villa;

pub use villa::{NewVilla, Villa, VillaChanges, VillaInput};
