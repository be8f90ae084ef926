//! 页面改编状态
//!
//! 每次页面加载只允许改编一次

/// 页面改编状态
///
/// 只能由 false 变为 true，且只在渲染成功后发生
#[derive(Debug, Default)]
pub struct PageTransformState {
    transformed: bool,
}

impl PageTransformState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_transformed(&self) -> bool {
        self.transformed
    }

    /// 标记为已改编
    pub fn mark_transformed(&mut self) {
        self.transformed = true;
    }
}
