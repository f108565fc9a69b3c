pub mod logging;
#[cfg(test)]
pub mod test_server;
#[cfg(test)]
pub mod test_utils;
pub mod url;
