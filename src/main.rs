use std::process;
use std::sync::Arc;

use atelier::{
    application::{
        auth::AuthService,
        error::AppError,
        images::{ImageGenerator, ImageService},
        posts::PostService,
        render::RenderService,
        repos::{ImagesRepo, ImagesWriteRepo, MediaStore, PostsRepo, PostsWriteRepo},
    },
    config,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, AdminState, PublicState},
        imagegen::ReqwestImageGenerator,
        storage::FsMediaStore,
        telemetry,
    },
};
use tokio::try_join;
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let (public_state, admin_state) = build_application_context(repositories, &settings)?;

    serve_http(&settings, public_state, admin_state).await
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))
        .map_err(AppError::from)?;

    let pool =
        PostgresRepositories::connect(database_url, settings.database.max_connections.get())
            .await
            .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    Ok(Arc::new(PostgresRepositories::new(pool)))
}

fn build_application_context(
    repositories: Arc<PostgresRepositories>,
    settings: &config::Settings,
) -> Result<(PublicState, AdminState), AppError> {
    let posts_repo: Arc<dyn PostsRepo> = repositories.clone();
    let posts_write_repo: Arc<dyn PostsWriteRepo> = repositories.clone();
    let images_repo: Arc<dyn ImagesRepo> = repositories.clone();
    let images_write_repo: Arc<dyn ImagesWriteRepo> = repositories.clone();

    let media: Arc<dyn MediaStore> = Arc::new(
        FsMediaStore::new(
            settings.media.directory.clone(),
            settings.media.public_base_url.clone(),
        )
        .map_err(|err| AppError::from(InfraError::Io(err)))?,
    );

    let generator: Arc<dyn ImageGenerator> = {
        let endpoint = settings
            .imagegen
            .endpoint
            .clone()
            .ok_or_else(|| InfraError::configuration("imagegen.endpoint is not configured"))
            .map_err(AppError::from)?;
        let api_key = settings.imagegen.api_key.clone().unwrap_or_default();
        Arc::new(
            ReqwestImageGenerator::new(endpoint, api_key)
                .map_err(|err| AppError::unexpected(err.to_string()))?,
        )
    };

    let (admin_email, admin_password) = match (
        settings.admin.email.as_deref(),
        settings.admin.password.as_deref(),
    ) {
        (Some(email), Some(password)) => (email, password),
        _ => {
            return Err(AppError::from(InfraError::configuration(
                "admin.email and admin.password must be configured",
            )));
        }
    };

    let renderer = Arc::new(RenderService::new());
    let auth = Arc::new(AuthService::new(
        admin_email,
        admin_password,
        settings.admin.session_ttl,
    ));

    let posts = Arc::new(PostService::new(
        posts_repo,
        posts_write_repo,
        renderer.clone(),
        settings.content.default_publish,
    ));
    let images = Arc::new(ImageService::new(
        images_repo,
        images_write_repo,
        media.clone(),
        generator,
    ));

    let public_state = PublicState {
        posts: posts.clone(),
        renderer,
        media,
    };
    let admin_state = AdminState {
        posts,
        images,
        auth,
    };

    Ok((public_state, admin_state))
}

async fn serve_http(
    settings: &config::Settings,
    public_state: PublicState,
    admin_state: AdminState,
) -> Result<(), AppError> {
    let public_router = http::build_public_router(public_state);
    let upload_body_limit = settings.media.max_upload_bytes.get() as usize;
    let admin_router = http::build_admin_router(admin_state, upload_body_limit);

    let public_listener = tokio::net::TcpListener::bind(settings.server.public_addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    let admin_listener = tokio::net::TcpListener::bind(settings.server.admin_addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "atelier::serve",
        public = %settings.server.public_addr,
        admin = %settings.server.admin_addr,
        "listening"
    );

    let public_server = axum::serve(public_listener, public_router.into_make_service());
    let admin_server = axum::serve(admin_listener, admin_router.into_make_service());

    try_join!(public_server, admin_server)
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}
