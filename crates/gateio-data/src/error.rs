//! 데이터 소스 에러 타입.

use thiserror::Error;

/// 데이터 소스 관련 에러.
#[derive(Debug, Error)]
pub enum DataError {
    /// 네트워크/전송 에러
    #[error("Network error: {0}")]
    Network(String),

    /// 업스트림 API 에러
    #[error("API error: {0}")]
    Api(String),

    /// 파싱/역직렬화 에러
    #[error("Parse error: {0}")]
    Parse(String),

    /// 파일 입출력 에러
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for DataError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Result 타입 별칭.
pub type Result<T> = std::result::Result<T, DataError>;
