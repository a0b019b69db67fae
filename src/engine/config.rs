/// Where a custom bond-length table comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum BondTableSource {
    /// TOML text with one `[[bond]]` table per record.
    Toml(String),
    /// JSON text holding an array of `{elements, length, bond_order}` records.
    Json(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PerceptionConfig {
    /// Custom bond-length table; `None` uses the embedded default.
    pub bond_table: Option<BondTableSource>,
    /// A pair is bonded when its distance is at most `reference length * tolerance`.
    pub tolerance: f64,
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self {
            bond_table: None,
            tolerance: 1.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Radius scale of each cluster's local circle.
    pub local_spacing: f64,
    /// Extent scale of the cluster-center layout.
    pub global_spacing: f64,
    /// Cluster-graph edge weight between clusters with the same fragment composition.
    pub related_weight: f64,
    /// Cluster-graph edge weight between all other cluster pairs.
    pub baseline_weight: f64,
    /// Force-directed iterations for the cluster centers.
    pub iterations: usize,
    /// Seed for the initial cluster positions; `None` uses a fixed default.
    pub seed: Option<u64>,
}

impl LayoutConfig {
    pub const DEFAULT_SEED: u64 = 0x5EED_A71A5;
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            local_spacing: 50.0,
            global_spacing: 1000.0,
            related_weight: 10.0,
            baseline_weight: 1.0,
            iterations: 50,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AtlasConfig {
    pub perception: PerceptionConfig,
    pub layout: LayoutConfig,
}
