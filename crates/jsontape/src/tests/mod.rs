#![cfg(all(feature = "dom", feature = "lazy"))]

mod utils;
