//! 构建器设置模块
//!
//! 显式的配置结构，只能通过类型化的键读写，不使用字符串键的设置字典。

use serde::{Deserialize, Serialize};

/// 设置键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Setting {
    /// 使用前去除字符串值两端空白
    Trim,
    /// 非预处理路径下对字面量字符串转义
    Escape,
    /// 使用参数绑定执行路径（关闭则走字面量拼接路径）
    Prepare,
    /// 每次终端操作后自动清空子句状态
    Autoreset,
    /// insert / update 前丢弃值为 null 的键
    CleanNull,
}

/// 构建器设置，按实例持有
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub trim: bool,
    pub escape: bool,
    pub prepare: bool,
    pub autoreset: bool,
    pub clean_null: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            trim: false,
            escape: true,
            prepare: true,
            autoreset: true,
            clean_null: true,
        }
    }
}

impl Settings {
    pub fn get(&self, key: Setting) -> bool {
        match key {
            Setting::Trim => self.trim,
            Setting::Escape => self.escape,
            Setting::Prepare => self.prepare,
            Setting::Autoreset => self.autoreset,
            Setting::CleanNull => self.clean_null,
        }
    }

    pub fn set(&mut self, key: Setting, value: bool) {
        match key {
            Setting::Trim => self.trim = value,
            Setting::Escape => self.escape = value,
            Setting::Prepare => self.prepare = value,
            Setting::Autoreset => self.autoreset = value,
            Setting::CleanNull => self.clean_null = value,
        }
    }
}
