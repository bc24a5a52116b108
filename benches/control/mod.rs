mod poly;
mod tuning;

pub use poly::bench_poly;
pub use tuning::bench_tuning;
