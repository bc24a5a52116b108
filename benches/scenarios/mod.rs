mod voice_bank;

pub use voice_bank::bench_voice_bank;
