/// Default number of decimals for every fixed-point number the tool prints.
pub const DEFAULT_PRECISION: usize = 6;

#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub precision: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
        }
    }
}
