mod credential_store;

pub(crate) use credential_store::CredentialStore;
