use serde::Deserialize;

/// 默认的摊还增长阈值。
pub const DEFAULT_AMORTIZED_THRESHOLD: usize = 256;

/// 追加超出容量时选择新缓冲大小的策略。
///
/// # 设计初衷（Why）
/// - 追加是否产生别名只取决于剩余容量是否足够，与增长系数无关；
///   增长系数因此只是实现选择，而不是契约，这里把它显式化为可配置项。
///
/// # 契约定义（What）
/// - [`grow`](Self::grow) 的返回值永远不小于 `needed`；
/// - 计算全部使用饱和运算，不会因溢出 panic；
/// - 反序列化使用 `policy` 字段作为标签，取值为 `exact`、`doubling`、`amortized`。
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(tag = "policy", rename_all = "kebab-case")]
pub enum GrowthPolicy {
    /// 新缓冲恰好容纳 `needed` 个元素。
    Exact,
    /// 从 `max(capacity, 1)` 起反复翻倍，直到不小于 `needed`。
    #[default]
    Doubling,
    /// 小容量翻倍、大容量按约 1.25 倍平滑增长；一次追加过多时直接取 `needed`。
    Amortized {
        #[serde(default = "default_threshold")]
        threshold: usize,
    },
}

fn default_threshold() -> usize {
    DEFAULT_AMORTIZED_THRESHOLD
}

impl GrowthPolicy {
    /// 以默认阈值构造摊还策略。
    pub fn amortized() -> Self {
        GrowthPolicy::Amortized {
            threshold: DEFAULT_AMORTIZED_THRESHOLD,
        }
    }

    /// 根据当前容量与所需长度计算新缓冲的槽位数。
    pub fn grow(&self, capacity: usize, needed: usize) -> usize {
        match *self {
            GrowthPolicy::Exact => needed,
            GrowthPolicy::Doubling => {
                let mut size = capacity.max(1);
                while size < needed {
                    size = size.saturating_mul(2);
                }
                size
            }
            GrowthPolicy::Amortized { threshold } => {
                if needed > capacity.saturating_mul(2) {
                    return needed;
                }
                if capacity < threshold {
                    return capacity.saturating_mul(2).max(needed);
                }
                let mut size = capacity.max(1);
                while size < needed {
                    // 步长至少为 1，threshold 为 0 时同样收敛。
                    let step = (size.saturating_add(threshold.saturating_mul(3)) / 4).max(1);
                    size = size.saturating_add(step);
                }
                size
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_allocates_only_what_is_needed() {
        assert_eq!(GrowthPolicy::Exact.grow(1, 2), 2);
        assert_eq!(GrowthPolicy::Exact.grow(10, 37), 37);
    }

    #[test]
    fn doubling_starts_from_one_for_empty_views() {
        let policy = GrowthPolicy::Doubling;
        assert_eq!(policy.grow(0, 3), 4);
        assert_eq!(policy.grow(1, 2), 2);
        assert_eq!(policy.grow(10, 11), 20);
        assert_eq!(policy.grow(10, 41), 80);
    }

    #[test]
    fn amortized_switches_regime_at_threshold() {
        let policy = GrowthPolicy::amortized();
        assert_eq!(policy.grow(1, 5), 5, "一次追加超过两倍容量时直接取 needed");
        assert_eq!(policy.grow(100, 101), 200);
        assert_eq!(policy.grow(512, 513), 512 + (512 + 3 * 256) / 4);
    }

    #[test]
    fn amortized_step_tracks_running_size() {
        // 512 -> 832 -> 1232：第二步按 832 重新计算步长。
        let policy = GrowthPolicy::amortized();
        assert_eq!(policy.grow(512, 1024), 1232);
    }

    #[test]
    fn amortized_with_zero_threshold_terminates() {
        let policy = GrowthPolicy::Amortized { threshold: 0 };
        assert!(policy.grow(1, 2) >= 2);
        assert!(policy.grow(3, 5) >= 5);
    }

    #[test]
    fn saturates_near_usize_max() {
        let needed = usize::MAX - 1;
        assert!(GrowthPolicy::Doubling.grow(usize::MAX / 2 + 1, needed) >= needed);
        assert!(GrowthPolicy::amortized().grow(usize::MAX / 2, needed) >= needed);
    }

    #[test]
    fn deserializes_from_tagged_table() {
        let exact: GrowthPolicy = toml::from_str(r#"policy = "exact""#).expect("解析 exact");
        assert_eq!(exact, GrowthPolicy::Exact);

        let amortized: GrowthPolicy =
            toml::from_str("policy = \"amortized\"\nthreshold = 64").expect("解析 amortized");
        assert_eq!(amortized, GrowthPolicy::Amortized { threshold: 64 });

        let defaulted: GrowthPolicy =
            toml::from_str(r#"policy = "amortized""#).expect("阈值缺省时应使用默认值");
        assert_eq!(defaulted, GrowthPolicy::amortized());

        assert!(toml::from_str::<GrowthPolicy>(r#"policy = "tripling""#).is_err());
    }
}
