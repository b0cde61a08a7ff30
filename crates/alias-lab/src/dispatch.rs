//! 多态句柄的空值分派。
//!
//! # 背景（Why）
//! - 若多态句柄由“类型标记 + 值指针”两部分组成，就可能出现标记非空而指针为空的状态：
//!   句柄与空值比较为假，只读取 `self` 的方法能调用成功，解引用 `self` 的方法则在运行时崩溃。
//! - 在 Rust 中句柄写作 `Option<Box<dyn Explodes>>`。把缺失的 `Bomb` 转换成句柄时，
//!   `None` 不携带任何类型标记，结果只能是缺失的句柄；`Some` 内的 trait 对象也必然指向有效值。
//!   因此上述陷阱无法被构造出来，本模块用类型证明这一点，而不是去复现它。

/// 两个方法分别对应“按引用接收”与“按值接收”的接口。
pub trait Explodes {
    fn bang(&self) -> &'static str;
    fn boom(&self) -> String;
}

/// 唯一的实现类型。
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Bomb {
    pub fuse: String,
}

impl Explodes for Bomb {
    fn bang(&self) -> &'static str {
        "bang"
    }

    fn boom(&self) -> String {
        format!("boom ({})", self.fuse)
    }
}

/// 分派结果。
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Detonation {
    /// 句柄缺失，没有任何方法被调用。
    Absent,
    /// 两个方法都分派到了有效值上。
    Fired { bang: &'static str, boom: String },
}

/// 把可能缺失的具体值擦除为多态句柄。
///
/// 缺失的值只会得到缺失的句柄，不存在“有类型、无值”的中间状态。
pub fn into_handle(bomb: Option<Box<Bomb>>) -> Option<Box<dyn Explodes>> {
    bomb.map(|bomb| bomb as Box<dyn Explodes>)
}

pub fn detonate(handle: Option<&dyn Explodes>) -> Detonation {
    match handle {
        None => Detonation::Absent,
        Some(explodes) => Detonation::Fired {
            bang: explodes.bang(),
            boom: explodes.boom(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_value_yields_absent_handle() {
        let handle = into_handle(None);
        assert!(handle.is_none(), "空值擦除后句柄同样为空");
        assert_eq!(detonate(handle.as_deref()), Detonation::Absent);
    }

    #[test]
    fn present_value_dispatches_both_methods() {
        let handle = into_handle(Some(Box::new(Bomb {
            fuse: "short".to_owned(),
        })));
        assert_eq!(
            detonate(handle.as_deref()),
            Detonation::Fired {
                bang: "bang",
                boom: "boom (short)".to_owned(),
            }
        );
    }
}
