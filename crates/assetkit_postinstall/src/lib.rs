//! `assetkit_postinstall`:
//! Post-install entry point that stages `./data` with `assetkit_io_fs`.

pub mod conf;
pub mod run;
