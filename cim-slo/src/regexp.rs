use regex::Regex;
use validator::ValidationError;

lazy_static::lazy_static! {
    static ref NAME_REGEX: Regex = Regex::new(
        r"^[a-z]([-a-z0-9]{0,30}[a-z0-9])?$",
    ).unwrap();
}

// 以小写字母开头，只包含小写字母、数字和中划线，不以中划线结尾，长度不超过32位
pub fn check_name(name: &str) -> Result<(), ValidationError> {
    if NAME_REGEX.is_match(name) {
        return Ok(());
    }
    Err(ValidationError::new("invalid name"))
}
