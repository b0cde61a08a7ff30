//! 复合记录的拷贝语义演示。
//!
//! 记录同时持有内联字段（`label`）与引用语义字段（`tags`）。`Clone` 复制内联字段，
//! 但 `tags` 只复制视图描述符，副本与原记录仍共享同一块缓冲。

use alias_view::{Result, View};

/// 拷贝方式。
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CopyMode {
    /// `Clone`：`tags` 与原记录共享缓冲。
    Shallow,
    /// [`Record::deep_clone`]：`tags` 复制到独立缓冲。
    Deep,
}

/// 待演示的复合记录。
#[derive(Clone, Debug)]
pub struct Record {
    pub label: String,
    pub tags: View<String>,
}

/// 修改副本之后两条记录的快照。
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecordCopyReport {
    pub mode: CopyMode,
    pub original_label: String,
    pub original_tags: Vec<String>,
    pub copy_label: String,
    pub copy_tags: Vec<String>,
    pub tags_shared: bool,
}

impl Record {
    pub fn new<L, I, S>(label: L, tags: I) -> Self
    where
        L: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            label: label.into(),
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    /// 复制记录并把 `tags` 迁移到私有缓冲。
    pub fn deep_clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            tags: self.tags.detached(),
        }
    }

    /// 按 `mode` 复制记录，改写副本的 `label` 与 `tags[0]`，返回两条记录的快照。
    ///
    /// # 契约说明（What）
    /// - `Shallow` 模式下，对副本 `tags[0]` 的改写同样出现在 `self` 中；这是演示目标，不是缺陷；
    /// - `label` 在两种模式下都互不影响；
    /// - `tags` 为空时返回 `OutOfRange`，此时 `self` 不会被修改。
    pub fn demonstrate_copy(
        &self,
        mode: CopyMode,
        label: impl Into<String>,
        tag: impl Into<String>,
    ) -> Result<RecordCopyReport> {
        let mut copy = match mode {
            CopyMode::Shallow => self.clone(),
            CopyMode::Deep => self.deep_clone(),
        };
        copy.label = label.into();
        copy.tags.set(0, tag.into())?;

        Ok(RecordCopyReport {
            mode,
            original_label: self.label.clone(),
            original_tags: self.tags.to_vec(),
            copy_label: copy.label.clone(),
            copy_tags: copy.tags.to_vec(),
            tags_shared: copy.tags.shares_buffer(&self.tags),
        })
    }
}
