//! Integration tests: drive the relnotes binary against throw-away git repositories

mod test_check;
mod test_report;
