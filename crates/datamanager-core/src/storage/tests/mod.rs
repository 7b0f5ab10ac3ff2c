// Storage test module
#[cfg(test)]
mod local_tests;
#[cfg(test)]
mod table_tests;
