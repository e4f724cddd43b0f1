pub mod earnings_pipeline;
