//! Per-chunk zone maps: the summary statistics a scan consults before
//! touching a chunk's row data at all. Pinned from the original
//! engine's `UpdateCurrentService`/`UpdateCurrentMetricFromString`.

#[derive(Debug, Clone)]
pub struct ZoneMap {
    pub ts_min_us: i64,
    pub ts_max_us: i64,
    pub svc_has: bool,
    pub svc_mixed: bool,
    pub svc_value: String,
    pub met_has: bool,
    pub met_mixed: bool,
    pub met_value: String,
}

impl ZoneMap {
    pub fn empty() -> Self {
        Self {
            ts_min_us: i64::MAX,
            ts_max_us: i64::MIN,
            svc_has: false,
            svc_mixed: false,
            svc_value: String::new(),
            met_has: false,
            met_mixed: false,
            met_value: String::new(),
        }
    }

    pub fn observe_timestamp(&mut self, ts_us: i64) {
        self.ts_min_us = self.ts_min_us.min(ts_us);
        self.ts_max_us = self.ts_max_us.max(ts_us);
    }

    /// `value` is `None` when the row's ServiceName/MetricName cell is
    /// NULL — a null can never satisfy an equality filter, so any chunk
    /// that has seen one must be treated as mixed (pruning disabled)
    /// rather than risk an incorrect skip.
    pub fn observe_service(&mut self, value: Option<&str>) {
        Self::observe_distinct(&mut self.svc_has, &mut self.svc_mixed, &mut self.svc_value, value);
    }

    pub fn observe_metric(&mut self, value: Option<&str>) {
        Self::observe_distinct(&mut self.met_has, &mut self.met_mixed, &mut self.met_value, value);
    }

    fn observe_distinct(has: &mut bool, mixed: &mut bool, stored: &mut String, value: Option<&str>) {
        if *mixed {
            return;
        }
        match value {
            None => *mixed = true,
            Some(v) => {
                if !*has {
                    *has = true;
                    stored.push_str(v);
                } else if stored != v {
                    *mixed = true;
                }
            }
        }
    }

    /// Whether a chunk whose zone map this is could contain any row
    /// with a timestamp in `[min_us, max_us]` (either bound optional).
    pub fn intersects_timestamp(&self, min_us: Option<i64>, max_us: Option<i64>) -> bool {
        if let Some(min_us) = min_us {
            if self.ts_max_us < min_us {
                return false;
            }
        }
        if let Some(max_us) = max_us {
            if self.ts_min_us > max_us {
                return false;
            }
        }
        true
    }

    /// Whether a chunk whose zone map this is could contain any row
    /// with `ServiceName = value`.
    pub fn could_match_service(&self, value: &str) -> bool {
        !(self.svc_has && !self.svc_mixed && self.svc_value != value)
    }

    pub fn could_match_metric(&self, value: &str) -> bool {
        !(self.met_has && !self.met_mixed && self.met_value != value)
    }
}
