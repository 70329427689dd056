//! 上传指标收集模块
//!
//! 记录订单归一化、批次组装与 sink 投递的运行指标。

use std::collections::BTreeMap;

use metrics::{counter, histogram};

/// 记录成功归一化的订单数
pub fn record_orders_normalized(count: usize) {
    counter!("market_uploader_orders_normalized_total").increment(count as u64);
}

/// 记录被丢弃的原始订单
pub fn record_record_rejected() {
    counter!("market_uploader_records_rejected_total").increment(1);
}

/// 记录组装完成的上传批次
pub fn record_batch_assembled(order_count: usize) {
    counter!("market_uploader_batches_total").increment(1);
    histogram!("market_uploader_batch_size").record(order_count as f64);
}

/// 记录 sink 投递结果
pub fn record_sink_delivery(sink_name: &str, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "market_uploader_sink_deliveries_total",
        "sink" => sink_name.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// 记录 sink 投递耗时
pub fn record_sink_latency_ms(sink_name: &str, latency_ms: f64) {
    histogram!(
        "market_uploader_sink_latency_ms",
        "sink" => sink_name.to_string()
    )
    .record(latency_ms);
}

/// 上传指标聚合器
///
/// 在内存中聚合一次运行的指标，便于输出摘要。
#[derive(Debug, Clone, Default)]
pub struct UploadMetricsAggregator {
    /// 批次总数
    pub total_batches: u64,

    /// 已上传订单总数
    pub total_orders: u64,

    /// 被丢弃的原始订单数
    pub total_rejected: u64,

    /// 因位置未知被丢弃的响应数
    pub responses_discarded: u64,

    /// 批次大小统计
    pub batch_size_stats: RunningStats,

    /// 各 sink 成功次数
    pub sink_successes: BTreeMap<String, u64>,

    /// 各 sink 失败次数
    pub sink_failures: BTreeMap<String, u64>,
}

impl UploadMetricsAggregator {
    /// 创建新的聚合器
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一个批次
    pub fn record_batch(&mut self, order_count: usize) {
        self.total_batches += 1;
        self.total_orders += order_count as u64;
        self.batch_size_stats.push(order_count as f64);
    }

    /// 记录被丢弃的订单
    pub fn record_rejected(&mut self, count: usize) {
        self.total_rejected += count as u64;
    }

    /// 记录被丢弃的响应
    pub fn record_discarded_response(&mut self) {
        self.responses_discarded += 1;
    }

    /// 记录一次 sink 投递
    pub fn record_delivery(&mut self, sink_name: &str, success: bool) {
        let map = if success {
            &mut self.sink_successes
        } else {
            &mut self.sink_failures
        };
        *map.entry(sink_name.to_string()).or_insert(0) += 1;
    }

    /// 生成摘要报告
    pub fn summary(&self) -> UploadMetricsSummary {
        let failures: u64 = self.sink_failures.values().sum();
        let successes: u64 = self.sink_successes.values().sum();
        let attempts = failures + successes;

        UploadMetricsSummary {
            total_batches: self.total_batches,
            total_orders: self.total_orders,
            total_rejected: self.total_rejected,
            responses_discarded: self.responses_discarded,
            delivery_failure_rate: if attempts > 0 {
                failures as f64 / attempts as f64 * 100.0
            } else {
                0.0
            },
            batch_size: StatsSummary::from(&self.batch_size_stats),
            sink_successes: self.sink_successes.clone(),
            sink_failures: self.sink_failures.clone(),
        }
    }

    /// 重置统计
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// 指标摘要
#[derive(Debug, Clone, Default)]
pub struct UploadMetricsSummary {
    pub total_batches: u64,
    pub total_orders: u64,
    pub total_rejected: u64,
    pub responses_discarded: u64,
    pub delivery_failure_rate: f64,
    pub batch_size: StatsSummary,
    pub sink_successes: BTreeMap<String, u64>,
    pub sink_failures: BTreeMap<String, u64>,
}

impl std::fmt::Display for UploadMetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Upload Metrics Summary ===")?;
        writeln!(f, "Batches: {}", self.total_batches)?;
        writeln!(f, "Orders uploaded: {}", self.total_orders)?;
        writeln!(f, "Records rejected: {}", self.total_rejected)?;
        writeln!(f, "Responses discarded: {}", self.responses_discarded)?;
        writeln!(
            f,
            "Delivery failure rate: {:.2}%",
            self.delivery_failure_rate
        )?;
        writeln!(f, "Batch size: {}", self.batch_size)?;

        if !self.sink_successes.is_empty() || !self.sink_failures.is_empty() {
            writeln!(f, "Per sink (ok/failed):")?;
            let names: std::collections::BTreeSet<_> = self
                .sink_successes
                .keys()
                .chain(self.sink_failures.keys())
                .collect();
            for name in names {
                writeln!(
                    f,
                    "  {}: {}/{}",
                    name,
                    self.sink_successes.get(name).copied().unwrap_or(0),
                    self.sink_failures.get(name).copied().unwrap_or(0)
                )?;
            }
        }

        Ok(())
    }
}

/// 统计摘要
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.1}, max={:.1}, mean={:.2}, std={:.2} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// 在线统计计算器 (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// 添加新值
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    /// 样本数量
    pub fn count(&self) -> u64 {
        self.count
    }

    /// 均值
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// 方差
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// 标准差
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// 最小值
    pub fn min(&self) -> f64 {
        self.min
    }

    /// 最大值
    pub fn max(&self) -> f64 {
        self.max
    }
}
