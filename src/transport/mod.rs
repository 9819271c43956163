// ==========================================
// 学校管理系统 - 传输层
// ==========================================
// 职责: 与后端的 HTTP 通信（reqwest）
// ==========================================

pub mod error;
pub mod http;

pub use error::{TransportError, TransportResult};
pub use http::{HttpTransport, QueryPair};
