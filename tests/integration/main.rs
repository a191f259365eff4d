mod common;

mod cli_run_test;
mod pipeline_test;
