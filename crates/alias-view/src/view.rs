use std::fmt;

use tracing::{debug, trace};

use crate::{
    buffer::Buffer,
    error::{Result, ViewError},
    growth::GrowthPolicy,
};

/// 追加操作实际走过的分支。
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AppendPath {
    /// 剩余容量足够，新元素写入原缓冲，结果与原视图共享存储。
    InPlace,
    /// 剩余容量不足，新元素与旧内容一起复制到新缓冲，结果不再与原视图共享存储。
    Reallocated {
        previous_capacity: usize,
        new_capacity: usize,
    },
}

/// `View` 是指向共享缓冲的一个窗口：起始偏移、可见长度与可写容量三者相互独立。
///
/// # 设计动机（Why）
/// - 切片的“长度”决定读写可见范围，“容量”决定追加时是否需要搬迁；
///   两者分离正是追加别名问题的来源，本类型完整保留这一语义以便复现与验证。
/// - `Clone` 只复制描述符（偏移、长度、容量）并共享缓冲句柄，不会复制元素。
///   需要独立副本时请调用 [`detached`](Self::detached)。
///
/// # 结构设计（How）
/// - `buffer`：共享的 [`Buffer`] 句柄；
/// - `offset`：窗口起点在缓冲中的绝对位置；
/// - `length`：从 `offset` 起可读写的元素数；
/// - `capacity`：从 `offset` 起到需要重新分配之前可用的槽位数。
///
/// # 契约说明（What）
/// - 恒有 `length <= capacity` 且 `offset + capacity <= buffer.physical_len()`；
/// - 对 `index < length` 的写入对所有覆盖同一绝对位置的视图立即可见；
/// - 写操作只需要 `&self`：别名本身就意味着共享可变性，借用检查无法也不应阻止它。
///
/// # 风险与取舍（Trade-offs）
/// - 每次访问都会获取缓冲上的自旋锁，单个操作因此是原子的；
///   跨多次调用的读改写序列仍需调用方自行串行化。
/// - 读取路径在持锁期间克隆元素，`T::clone` 不得访问同一缓冲；
///   `Debug` 与被覆盖元素的 `Drop` 都在锁外执行。
pub struct View<T> {
    buffer: Buffer<T>,
    offset: usize,
    length: usize,
    capacity: usize,
}

impl<T> View<T> {
    fn from_parts(buffer: Buffer<T>, offset: usize, length: usize, capacity: usize) -> Self {
        debug_assert!(length <= capacity);
        debug_assert!(offset + capacity <= buffer.physical_len());
        Self {
            buffer,
            offset,
            length,
            capacity,
        }
    }

    /// 长度与容量均为 0 的空视图。
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    /// 以给定元素构造视图，缓冲大小恰为元素个数。
    ///
    /// 结果满足 `offset = 0`、`length = capacity = items.len()`，因此下一次非空追加必然重新分配。
    pub fn from_vec(items: Vec<T>) -> Self {
        let len = items.len();
        Self::from_parts(Buffer::from_vec(items), 0, len, len)
    }

    /// 分配 `capacity` 个默认值槽位，并暴露其中前 `length` 个。
    ///
    /// # 错误
    /// - `length > capacity` 时返回 [`ViewError::InvalidArgument`]，不会截断到容量。
    pub fn with_len(length: usize, capacity: usize) -> Result<Self>
    where
        T: Default,
    {
        if length > capacity {
            return Err(ViewError::InvalidArgument { length, capacity });
        }
        Ok(Self::from_parts(Buffer::filled(capacity), 0, length, capacity))
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// 不触发重新分配即可追加的元素数。
    pub fn spare_capacity(&self) -> usize {
        self.capacity - self.length
    }

    /// 底层缓冲句柄。
    pub fn buffer(&self) -> &Buffer<T> {
        &self.buffer
    }

    /// 当前引用底层缓冲的句柄数量。
    pub fn buffer_handles(&self) -> usize {
        self.buffer.handles()
    }

    /// 两个视图是否引用同一块缓冲，不论窗口是否重叠。
    pub fn shares_buffer(&self, other: &View<T>) -> bool {
        self.buffer.same_as(&other.buffer)
    }

    /// 两个视图的可见窗口是否覆盖同一绝对位置。
    ///
    /// 只比较 `length` 范围：剩余容量的重叠要等到追加时才会变成可见的覆盖。
    pub fn aliases(&self, other: &View<T>) -> bool {
        if !self.shares_buffer(other) || self.is_empty() || other.is_empty() {
            return false;
        }
        self.offset < other.offset + other.length && other.offset < self.offset + self.length
    }

    /// 在同一缓冲上截取 `[from, to)`，不复制任何元素。
    ///
    /// # 契约说明（What）
    /// - 结果：`offset + from`、长度 `to - from`、容量 `capacity - from`；
    /// - `to` 只能到达当前长度，不能借重切片“看见”剩余容量中的内容；
    /// - 不满足 `from <= to <= len` 时返回 [`ViewError::ResliceOutOfRange`]。
    pub fn reslice(&self, from: usize, to: usize) -> Result<Self> {
        if from > to || to > self.length {
            return Err(ViewError::ResliceOutOfRange {
                from,
                to,
                length: self.length,
            });
        }
        Ok(Self::from_parts(
            self.buffer.clone(),
            self.offset + from,
            to - from,
            self.capacity - from,
        ))
    }

    /// 带容量上限的重切片 `[from, to, max)`，结果容量为 `max - from`。
    ///
    /// 取 `max == to` 时结果没有剩余容量，其后的任何非空追加都会搬迁到新缓冲，
    /// 从而不会覆盖原视图之后的槽位。边界要求 `from <= to <= max <= capacity`。
    pub fn reslice_full(&self, from: usize, to: usize, max: usize) -> Result<Self> {
        if from > to || to > max || max > self.capacity {
            return Err(ViewError::SliceOutOfRange {
                from,
                to,
                max,
                bound: self.capacity,
            });
        }
        Ok(Self::from_parts(
            self.buffer.clone(),
            self.offset + from,
            to - from,
            max - from,
        ))
    }

    /// 写入 `offset + index` 处的槽位，对所有覆盖该位置的视图可见。
    ///
    /// # 错误
    /// - `index >= len` 时返回 [`ViewError::IndexOutOfRange`]，与剩余容量无关。
    pub fn set(&self, index: usize, value: T) -> Result<()> {
        self.check_index(index)?;
        self.buffer.set(self.offset + index, value);
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.length {
            return Err(ViewError::IndexOutOfRange {
                index,
                length: self.length,
            });
        }
        Ok(())
    }

    fn window(&self) -> core::ops::Range<usize> {
        self.offset..self.offset + self.length
    }
}

impl<T: Clone> View<T> {
    /// 读取 `offset + index` 处元素的副本。
    pub fn get(&self, index: usize) -> Result<T> {
        self.check_index(index)?;
        Ok(self.buffer.get(self.offset + index))
    }

    /// 复制可见窗口内的全部元素。
    pub fn to_vec(&self) -> Vec<T> {
        self.buffer.read(self.window())
    }

    /// 把可见窗口复制到一块独立的新缓冲，结果容量等于长度。
    pub fn detached(&self) -> Self {
        Self::from_vec(self.to_vec())
    }

    /// 从 `src` 复制 `min(len, src.len)` 个元素到本视图起始处，返回复制数量。
    ///
    /// # 执行逻辑（How）
    /// 1. 先在源缓冲的锁内取出源窗口的快照；
    /// 2. 释放源锁后再写入目标缓冲。
    ///
    /// 两个视图位于同一缓冲且窗口重叠时，结果与 `slice::copy_within` 一致；
    /// 任何时刻最多只持有一把锁。
    pub fn copy_from(&self, src: &View<T>) -> usize {
        let count = self.length.min(src.length);
        if count == 0 {
            return 0;
        }
        let values = src.buffer.read(src.offset..src.offset + count);
        self.buffer.write(self.offset, values);
        count
    }
}

impl<T: Clone + Default> View<T> {
    /// 使用默认增长策略追加元素，返回新的视图。
    ///
    /// 返回值是否与 `self` 共享缓冲完全取决于剩余容量是否足够，详见 [`append_with`](Self::append_with)。
    pub fn append<I>(&self, elements: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        self.append_with(&GrowthPolicy::default(), elements).0
    }

    /// 追加元素并报告走过的分支。
    ///
    /// # 执行逻辑（How）
    /// 1. 先收集 `elements`，避免在持锁期间执行调用方的迭代器代码；
    /// 2. 令 `needed = len + elements.len()`；
    /// 3. `needed <= capacity`：从 `offset + len` 起覆盖写入原缓冲，
    ///    即使另一个视图正把这些槽位当作“自己长度之外的剩余容量”。
    ///    结果保留原偏移与容量，长度为 `needed`；
    /// 4. 否则按 `policy` 选定新大小（不小于 `needed`），复制旧的 `len` 个元素并写入新元素，
    ///    其余槽位填充默认值；结果偏移为 0，与原缓冲再无关联。
    ///
    /// # 契约说明（What）
    /// - 分支只由容量是否足够决定，与调用方、缓冲句柄数量或增长策略都无关；
    /// - `self` 本身的偏移、长度、容量不变，但第 3 步可能改写它剩余容量中的槽位。
    pub fn append_with<I>(&self, policy: &GrowthPolicy, elements: I) -> (Self, AppendPath)
    where
        I: IntoIterator<Item = T>,
    {
        let incoming: Vec<T> = elements.into_iter().collect();
        let needed = self.length.saturating_add(incoming.len());

        if needed <= self.capacity {
            let position = self.offset + self.length;
            trace!(position, count = incoming.len(), "append writes into spare capacity");
            self.buffer.write(position, incoming);
            let view = Self::from_parts(self.buffer.clone(), self.offset, needed, self.capacity);
            return (view, AppendPath::InPlace);
        }

        let new_capacity = policy.grow(self.capacity, needed).max(needed);
        debug!(
            previous_capacity = self.capacity,
            new_capacity,
            needed,
            "append reallocates backing buffer"
        );
        let mut slots = self.buffer.read(self.window());
        slots.reserve_exact(new_capacity - slots.len());
        slots.extend(incoming);
        slots.resize_with(new_capacity, T::default);
        let view = Self::from_parts(Buffer::from_vec(slots), 0, needed, new_capacity);
        (
            view,
            AppendPath::Reallocated {
                previous_capacity: self.capacity,
                new_capacity,
            },
        )
    }
}

impl<T> Clone for View<T> {
    fn clone(&self) -> Self {
        Self::from_parts(self.buffer.clone(), self.offset, self.length, self.capacity)
    }
}

impl<T> Default for View<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for View<T> {
    fn from(items: Vec<T>) -> Self {
        Self::from_vec(items)
    }
}

impl<T> FromIterator<T> for View<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for View<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 先取快照再格式化，元素的 `Debug` 可以自由读取同一缓冲。
        let elements = self.to_vec();
        f.debug_struct("View")
            .field("offset", &self.offset)
            .field("len", &self.length)
            .field("capacity", &self.capacity)
            .field("elements", &elements)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    #[traced_test]
    fn reallocation_is_logged_with_capacities() {
        let view = View::from_vec(vec![1u8]);
        let (_, path) = view.append_with(&GrowthPolicy::Doubling, [2]);
        assert_eq!(
            path,
            AppendPath::Reallocated {
                previous_capacity: 1,
                new_capacity: 2,
            }
        );
        assert!(logs_contain("append reallocates backing buffer"));
        assert!(logs_contain("new_capacity=2"));
    }

    #[test]
    #[traced_test]
    fn in_place_append_does_not_log_reallocation() {
        let view: View<u8> = View::with_len(0, 4).expect("构造视图");
        let (_, path) = view.append_with(&GrowthPolicy::Doubling, [1, 2]);
        assert_eq!(path, AppendPath::InPlace);
        assert!(!logs_contain("append reallocates backing buffer"));
    }

    #[test]
    fn clone_copies_descriptor_and_shares_buffer() {
        let view = View::from_vec(vec!['a', 'b']);
        let copy = view.clone();
        assert!(copy.shares_buffer(&view));
        assert_eq!(view.buffer_handles(), 2);
        copy.set(0, 'z').expect("写入副本");
        assert_eq!(view.to_vec(), vec!['z', 'b']);
    }

    #[test]
    fn empty_views_never_alias() {
        let view: View<u8> = View::with_len(2, 4).expect("构造视图");
        let empty = view.reslice(1, 1).expect("空重切片");
        assert!(empty.shares_buffer(&view));
        assert!(!empty.aliases(&view));
    }

    #[test]
    fn append_of_nothing_keeps_the_buffer() {
        let view = View::from_vec(vec![1, 2]);
        let (same, path) = view.append_with(&GrowthPolicy::Exact, Vec::new());
        assert_eq!(path, AppendPath::InPlace);
        assert!(same.shares_buffer(&view));
        assert_eq!(same.len(), 2);
    }

    #[test]
    fn debug_lists_visible_elements_only() {
        let view: View<u8> = View::with_len(1, 3).expect("构造视图");
        let rendered = format!("{view:?}");
        assert_eq!(
            rendered,
            "View { offset: 0, len: 1, capacity: 3, elements: [0] }"
        );
    }
}
