
#[cfg(test)]
mod chat_validation_tests;
#[cfg(test)]
mod contact_tests;
