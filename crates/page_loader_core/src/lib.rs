//! Page loader core: pure naming and origin rules, no IO.
mod names;
mod origin;

pub use names::{
    derive_from_url, filename_for, resources_dir_for, PageNames, FALLBACK_FILENAME, SEPARATOR,
};
pub use origin::is_same_origin;
