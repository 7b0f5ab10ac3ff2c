#[cfg(test)]
mod composite_tests;
