use tracing_subscriber::EnvFilter;
use tweetlike::tweets::{Click, Client, LikeToggleHandler, LikeView, TweetId, Views};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let endpoint = std::env::var("TWEETLIKE_ENDPOINT")?;
    let csrf = std::env::var("TWEETLIKE_CSRF")?;

    let mut builder = Client::builder().endpoint(&endpoint).csrf_token(&csrf);

    if let Ok(session) = std::env::var("TWEETLIKE_SESSION")
        && !session.is_empty()
    {
        builder = builder.with_session(&session);
    }

    let handler = LikeToggleHandler::new(builder.build()?, Views::new());

    let name = std::env::args().nth(1).unwrap_or_else(|| "1".to_owned());
    let id: TweetId = name.parse()?;

    // The starting count is unknown here; the first answer replaces it.
    handler.views().insert(id.clone(), LikeView::unliked(0));

    let result = handler.click(&mut Click::new(Some(&name))).await?;

    println!("{} tweet {}: {} likes", result.method, result.id, result.like_count);

    if let Some(html) = handler.views().render(&id) {
        println!("{html}");
    }

    Ok(())
}
