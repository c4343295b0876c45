#![allow(dead_code)]

pub mod server;
pub mod simulgo;

pub mod utils {
    pub mod prelude {
        pub use anyhow::{anyhow, Context, Error};
        pub type Result<T> = anyhow::Result<T, Error>;

        pub use std::{
            collections::{BTreeSet, HashSet, HashMap},
            ops::{Add, Sub}
        };
    }
}

pub mod prelude {
    pub use super::server::*;
    pub use super::simulgo::prelude::*;
    pub use super::utils::prelude::*;
}
