mod password;
mod validation;

pub use password::{
    check_password_policy,
    hash_in_background,
    verify_in_background,
    PasswordError,
    MIN_PASSWORD_LENGTH,
};
pub use validation::{is_valid_email, is_valid_username};
