//! 配置校验模块
//!
//! 校验规则：
//! - timezone 非空
//! - log_file.filename 非空，且为单纯文件名 (不含路径分隔符)
//! - email: host 非空、port > 0、sender/recipient 为邮件地址

use contracts::{ContractError, EmailConfig, LogFileConfig, LoggerConfig};

/// 校验 LoggerConfig 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(config: &LoggerConfig) -> Result<(), ContractError> {
    validate_timezone(config)?;
    if let Some(log_file) = &config.log_file {
        validate_log_file(log_file)?;
    }
    if let Some(email) = &config.email {
        validate_email(email)?;
    }
    Ok(())
}

/// 时区名称的合法性由 facade 构建时检查
fn validate_timezone(config: &LoggerConfig) -> Result<(), ContractError> {
    match config.timezone.as_deref() {
        Some(tz) if tz.trim().is_empty() => Err(ContractError::config_validation(
            "timezone",
            "timezone must not be empty; omit it for UTC",
        )),
        _ => Ok(()),
    }
}

fn validate_log_file(log_file: &LogFileConfig) -> Result<(), ContractError> {
    if log_file.filename.is_empty() {
        return Err(ContractError::config_validation(
            "log_file.filename",
            "filename is required",
        ));
    }
    if log_file.filename.contains(['/', '\\']) {
        return Err(ContractError::config_validation(
            "log_file.filename",
            format!("'{}' must be a bare file name", log_file.filename),
        ));
    }
    Ok(())
}

fn validate_email(email: &EmailConfig) -> Result<(), ContractError> {
    if email.host.trim().is_empty() {
        return Err(ContractError::config_validation(
            "email.host",
            "SMTP host is required",
        ));
    }
    if email.port == 0 {
        return Err(ContractError::config_validation(
            "email.port",
            "port must be > 0",
        ));
    }
    for (field, address) in [
        ("email.sender", &email.sender),
        ("email.recipient", &email.recipient),
    ] {
        if !address.contains('@') {
            return Err(ContractError::config_validation(
                field,
                format!("'{address}' is not an email address"),
            ));
        }
    }
    Ok(())
}
