pub mod form;
pub mod upload;

pub use form::FormFields;
pub use upload::{read_file_field, UploadedFile};
