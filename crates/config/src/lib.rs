use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub mongo: MongoSettings,
    pub auth: AuthSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoSettings {
    pub uri: String,
    pub database: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub jwt_secret: String,
}

impl Settings {
    /// Layered load: code defaults, then an optional `config/default` file,
    /// then `PAWCARE__*` environment variables (e.g. `PAWCARE__SERVER__PORT`).
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("mongo.uri", "mongodb://localhost:27017")?
            .set_default("mongo.database", "pawcare")?
            .set_default("auth.jwt_secret", "insecure-dev-secret")?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::Environment::with_prefix("PAWCARE").separator("__"));

        builder.build()?.try_deserialize()
    }
}
