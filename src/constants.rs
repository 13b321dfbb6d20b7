pub const N_ROWS: usize = 8;
pub const N_COLUMNS: usize = 8;
pub const N_SQUARES: usize = N_ROWS * N_COLUMNS;
