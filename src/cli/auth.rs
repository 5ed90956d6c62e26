use crate::{Res, config::Config, logger::SessionLog, spotify};

pub async fn auth(config: &Config, log: &SessionLog) -> Res<()> {
    spotify::auth::auth(config, log).await?;
    Ok(())
}
