use std::io;
use thiserror::Error;

/// 边界错误 - 只在解析外部输入（文章列表、配置、标签列表）时出现
#[derive(Debug, Error)]
pub enum BlogError {
    /// JSON 数据无法解析
    #[error("解析{context}失败: {source}")]
    Json {
        /// 正在解析的数据名称
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
    /// 配置项取值非法
    #[error("配置无效: {0}")]
    InvalidConfig(String),
    /// 读取文件失败
    #[error("读取文件失败: {0}")]
    Io(#[from] io::Error),
}

impl BlogError {
    pub fn json(context: &'static str, source: serde_json::Error) -> Self {
        BlogError::Json { context, source }
    }
}
