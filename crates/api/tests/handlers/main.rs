mod test_utils;

mod auth_test;
mod middleware_test;
mod slot_test;
mod static_test;
