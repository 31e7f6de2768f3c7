pub mod consts;
pub mod errors;
pub mod ext_traits;
pub mod fp_utils;
pub mod request;

pub use errors::CustomResult;
