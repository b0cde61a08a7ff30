use std::{fmt, mem, ops::Range, sync::Arc};

use spin::Mutex;

/// `Buffer` 是若干视图共享的定长底层存储。
///
/// # 设计动机（Why）
/// - 切片别名问题的根源在于“多个视图指向同一块内存”，因此缓冲不能归属于任何单一视图，
///   必须以共享句柄的形式被引用。
/// - 句柄基于 `Arc` 计数，最后一个句柄释放时内存随之回收，调用方无需手动管理生命周期。
///
/// # 结构设计（How）
/// - `slots`：`spin::Mutex` 保护的定长 `Box<[T]>`，每块缓冲恰有一把锁；
/// - `len`：物理槽位数，分配后不再变化，缓存在句柄上以免读取时加锁。
///
/// # 契约说明（What）
/// - 缓冲只能由 [`View`](crate::View) 的构造与扩容路径分配；
/// - 所有写入都经由视图完成，视图负责边界校验，本类型只做按绝对位置的存取；
/// - 单次存取持锁、返回前释放锁；
/// - 读取路径在持锁期间调用 `T::clone`，因此 `Clone` 实现不得访问同一缓冲；
///   写入路径把被覆盖的旧值移出锁外再释放，`T::drop` 不受此限制。
pub struct Buffer<T> {
    slots: Arc<Mutex<Box<[T]>>>,
    len: usize,
}

impl<T> Buffer<T> {
    /// 以给定元素作为全部槽位创建缓冲。
    pub(crate) fn from_vec(items: Vec<T>) -> Self {
        let len = items.len();
        Self {
            slots: Arc::new(Mutex::new(items.into_boxed_slice())),
            len,
        }
    }

    /// 分配 `len` 个默认值槽位。
    pub(crate) fn filled(len: usize) -> Self
    where
        T: Default,
    {
        Self::from_vec((0..len).map(|_| T::default()).collect())
    }

    /// 物理槽位数。
    pub fn physical_len(&self) -> usize {
        self.len
    }

    /// 判断两个句柄是否指向同一块缓冲。
    pub fn same_as(&self, other: &Buffer<T>) -> bool {
        Arc::ptr_eq(&self.slots, &other.slots)
    }

    /// 当前存活的句柄数量（即引用该缓冲的视图与句柄总数）。
    pub fn handles(&self) -> usize {
        Arc::strong_count(&self.slots)
    }

    /// 复制全部物理槽位，包括任何视图都不可见的剩余容量部分。
    pub fn snapshot(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.slots.lock().to_vec()
    }

    pub(crate) fn read(&self, range: Range<usize>) -> Vec<T>
    where
        T: Clone,
    {
        debug_assert!(range.end <= self.len);
        self.slots.lock()[range].to_vec()
    }

    pub(crate) fn get(&self, position: usize) -> T
    where
        T: Clone,
    {
        self.slots.lock()[position].clone()
    }

    pub(crate) fn set(&self, position: usize, value: T) {
        let replaced = mem::replace(&mut self.slots.lock()[position], value);
        drop(replaced);
    }

    /// 从绝对位置 `start` 起依次覆盖写入 `values`。
    pub(crate) fn write(&self, start: usize, values: Vec<T>) {
        debug_assert!(start + values.len() <= self.len);
        let replaced: Vec<T> = {
            let mut slots = self.slots.lock();
            slots[start..]
                .iter_mut()
                .zip(values)
                .map(|(slot, value)| mem::replace(slot, value))
                .collect()
        };
        drop(replaced);
    }
}

impl<T> Clone for Buffer<T> {
    fn clone(&self) -> Self {
        Self {
            slots: Arc::clone(&self.slots),
            len: self.len,
        }
    }
}

impl<T> fmt::Debug for Buffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("physical_len", &self.len)
            .field("handles", &self.handles())
            .finish()
    }
}
