pub mod pipelines;

pub use pipelines::earnings_pipeline::EarningsPipeline;
