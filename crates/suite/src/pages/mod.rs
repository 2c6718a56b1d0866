//! Page objects for the product under test.
//!
//! Each page is a plain struct of locators plus an [`Actions`] handle; shared
//! behavior comes from composing the action primitives, not from a base-page
//! hierarchy.
//!
//! [`Actions`]: gx_core::Actions

pub mod auth;
pub mod image;

pub use auth::{SignInPage, SignUpPage};
pub use image::ImageGeneratorPage;
