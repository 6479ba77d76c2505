pub const UPDATED: &str = "Progress updated successfully!";

/// Percentages for each wellness area. Only kept for as long as the dashboard is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub mental: u8,
    pub fitness: u8,
    pub nutrition: u8,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            mental: 60,
            fitness: 80,
            nutrition: 50,
        }
    }
}

impl Progress {
    pub const MAX: u8 = 100;

    pub fn update(&mut self) {
        *self = Self {
            mental: Self::MAX,
            fitness: Self::MAX,
            nutrition: Self::MAX,
        };
    }
}
