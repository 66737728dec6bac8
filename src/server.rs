use std::io;
use std::sync::Arc;

use chrono::{Duration, Local};
use ntex::http::header;
use ntex::web;
use ntex::web::HttpRequest;
use ntex_files::NamedFile;
use spdlog::{error, info, warn};

use crate::category::CategoryKey;
use crate::config::Config;
use crate::image_relay::{ImageRelay, RelayedImage, CACHE_CONTROL};
use crate::news::{Article, CategoryListing, HomeFeed, NewsService};
use crate::normalizer::Normalizer;
use crate::query_string::QueryString;
use crate::view::article_renderer::{og_image, ArticleRenderer};
use crate::view::layout_renderer::{LayoutRenderer, PageMeta};
use crate::view::list_renderer::ListRenderer;
use crate::view::{article_link, category_link, read_template, render_message};
use crate::wordpress::cached_source::CachedSource;
use crate::wordpress::client::WordPressClient;
use crate::wordpress::PostSource;

struct AppState<S> {
    news: NewsService<S>,
    relay: ImageRelay,
    config: Config,
}

impl<S: PostSource> AppState<S> {
    fn new(source: S, config: Config) -> anyhow::Result<Self> {
        let news = NewsService::new(
            source,
            config.category_table(),
            Normalizer::from_site(&config.site),
            config.defaults.clone(),
        );
        let relay = ImageRelay::new(&config.wordpress.user_agent)?;

        Ok(AppState {
            news,
            relay,
            config,
        })
    }
}

type SharedState<S> = web::types::State<Arc<AppState<S>>>;

const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

fn get_cur_page(req: &HttpRequest) -> usize {
    QueryString::from_optional(req.uri().query()).get_page()
}

fn html(body: String) -> web::HttpResponse {
    web::HttpResponse::Ok()
        .content_type(HTML_CONTENT_TYPE)
        .body(body)
}

fn internal_error(context: &str, err: io::Error) -> web::HttpResponse {
    error!("{}: {}", context, err);
    web::HttpResponse::InternalServerError()
        .body(format!("{}: {}", context, err))
}

/// Wraps an already rendered body with the site layout
fn render_page(config: &Config, meta: &PageMeta, current: Option<CategoryKey>, body: &str) -> io::Result<String> {
    let layout_src = read_template(&config.paths.template_dir, "layout.tpl")?;
    let layout = LayoutRenderer::new(&layout_src, &config.site.name)?;
    Ok(layout.render(meta, Local::now().date_naive(), current, body))
}

fn site_meta(config: &Config, title: String, url: String) -> PageMeta {
    PageMeta {
        title,
        description: config.site.description.clone(),
        og_type: "website",
        og_image: og_image(&config.site.url, &config.site.default_image, ""),
        url,
    }
}

fn site_url(config: &Config, path: &str) -> String {
    format!("{}{}", config.site.url.trim_end_matches('/'), path)
}

fn render_not_found(config: &Config, title: &str, message: &str) -> io::Result<String> {
    let tpl_src = read_template(&config.paths.template_dir, "not_found.tpl")?;
    let body = render_message(&tpl_src, title, message)?;
    let meta = site_meta(config, format!("{} | {}", title, config.site.name), site_url(config, "/"));
    render_page(config, &meta, None, &body)
}

fn not_found(config: &Config, title: &str, message: &str) -> web::HttpResponse {
    match render_not_found(config, title, message) {
        Ok(page) => web::HttpResponse::NotFound()
            .content_type(HTML_CONTENT_TYPE)
            .body(page),
        Err(e) => internal_error("Error rendering not found page", e),
    }
}

fn article_not_found(config: &Config, slug: &str) -> web::HttpResponse {
    info!("Article not found: {}", slug);
    not_found(config, "Noticia no encontrada", "La noticia que buscás no existe o fue removida.")
}

fn section_not_found(config: &Config, section: &str) -> web::HttpResponse {
    info!("Unknown section: {}", section);
    not_found(config, "Sección no encontrada", "La sección que buscás no existe.")
}

fn render_home<S>(state: &AppState<S>, cur_page: usize, feed: &HomeFeed) -> io::Result<String> {
    let config = &state.config;
    let tpl_src = read_template(&config.paths.template_dir, "home.tpl")?;
    let renderer = ListRenderer::new(&tpl_src, &config.defaults)?;
    let body = renderer.render_home(feed, config.defaults.featured_count, cur_page);

    let meta = site_meta(config, config.site.name.clone(), site_url(config, "/"));
    render_page(config, &meta, None, &body)
}

async fn index<S: PostSource + 'static>(req: HttpRequest, state: SharedState<S>) -> web::HttpResponse {
    let cur_page = get_cur_page(&req);
    let feed = state.news.load_home().await;

    match render_home(&state, cur_page, &feed) {
        Ok(page) => html(page),
        Err(e) => internal_error("Error rendering home", e),
    }
}

fn render_category<S>(state: &AppState<S>, key: CategoryKey, cur_page: usize, listing: &CategoryListing) -> io::Result<String> {
    let config = &state.config;
    let tpl_src = read_template(&config.paths.template_dir, "category.tpl")?;
    let renderer = ListRenderer::new(&tpl_src, &config.defaults)?;
    let body = renderer.render_category(listing, cur_page);

    let title = format!("{} | {}", key.name(), config.site.name);
    let meta = site_meta(config, title, site_url(config, &category_link(key)));
    render_page(config, &meta, Some(key), &body)
}

async fn view_category<S: PostSource + 'static>(
    req: HttpRequest,
    path: web::types::Path<String>,
    state: SharedState<S>) -> web::HttpResponse {
    let section = path.into_inner();
    let Ok(key) = section.parse::<CategoryKey>() else {
        return section_not_found(&state.config, &section);
    };

    let cur_page = get_cur_page(&req);
    let listing = state.news.load_category(key).await;

    match render_category(&state, key, cur_page, &listing) {
        Ok(page) => html(page),
        Err(e) => internal_error("Error rendering section", e),
    }
}

fn render_article<S: PostSource>(state: &AppState<S>, article: &Article) -> io::Result<String> {
    let config = &state.config;
    let post = &article.post;
    let tpl_src = read_template(&config.paths.template_dir, "article.tpl")?;
    let body = ArticleRenderer::new(&tpl_src)?.render(article);

    let meta = PageMeta {
        title: format!("{} | {}", post.title, config.site.name),
        description: post.subtitle.clone(),
        og_type: "article",
        og_image: og_image(&config.site.url, state.news.normalizer().default_image(), &post.image),
        url: site_url(config, &article_link(post.category_key, &post.id)),
    };
    render_page(config, &meta, Some(post.category_key), &body)
}

fn article_response<S: PostSource>(state: &AppState<S>, slug: &str, article: Option<Article>) -> web::HttpResponse {
    let Some(article) = article else {
        return article_not_found(&state.config, slug);
    };

    match render_article(state, &article) {
        Ok(page) => html(page),
        Err(e) => internal_error("Error rendering article", e),
    }
}

async fn view_article_by_slug<S: PostSource + 'static>(
    req: HttpRequest,
    path: web::types::Path<String>,
    state: SharedState<S>) -> web::HttpResponse {
    let slug = path.into_inner();
    let qs = QueryString::from_optional(req.uri().query());
    let section = qs.get("section").and_then(|s| match s.parse::<CategoryKey>() {
        Ok(key) => Some(key),
        Err(e) => {
            warn!("Ignoring section parameter: {}", e);
            None
        }
    });

    let article = state.news.load_article_by_slug(&slug, section).await;
    article_response(&state, &slug, article)
}

async fn view_article<S: PostSource + 'static>(
    path: web::types::Path<(String, String)>,
    state: SharedState<S>) -> web::HttpResponse {
    let (section, slug) = path.into_inner();
    let Ok(key) = section.parse::<CategoryKey>() else {
        return section_not_found(&state.config, &section);
    };

    let article = state.news.load_article(key, &slug).await;
    article_response(&state, &slug, article)
}

fn image_response(url: &str, relayed: anyhow::Result<RelayedImage>) -> web::HttpResponse {
    match relayed {
        Ok(image) => web::HttpResponse::Ok()
            .content_type(image.content_type.as_str())
            .header(header::CACHE_CONTROL, CACHE_CONTROL)
            .body(image.bytes),
        Err(e) => {
            warn!("Error relaying image {}: {}", url, e);
            web::HttpResponse::InternalServerError()
                .json(&serde_json::json!({"error": "Failed to fetch image"}))
        }
    }
}

async fn relay_image<S: PostSource + 'static>(req: HttpRequest, state: SharedState<S>) -> web::HttpResponse {
    let qs = QueryString::from_optional(req.uri().query());
    let Some(url) = qs.get("url") else {
        return web::HttpResponse::BadRequest()
            .json(&serde_json::json!({"error": "Missing url parameter"}));
    };

    let relayed = state.relay.fetch(url).await;
    image_response(url, relayed)
}

fn public_file(config: &Config, file_name: String) -> Result<NamedFile, web::Error> {
    if file_name.contains("..") {
        return Err(web::error::ErrorUnauthorized("Access forbidden").into());
    }

    let file_path = config.paths.public_dir.join(file_name);
    Ok(NamedFile::open(file_path)?)
}

async fn public_files<S: PostSource + 'static>(path: web::types::Path<String>, state: SharedState<S>) -> Result<NamedFile, web::Error> {
    public_file(&state.config, path.into_inner())
}

/// Route table. The slug route comes before the section/article route so
/// "articulo" is not taken as a section. Root files, such as the default
/// image, come last.
fn routes<S: PostSource + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(index::<S>)))
        .service(web::resource("/api/image").route(web::get().to(relay_image::<S>)))
        .service(web::resource("/public/{file_name}").route(web::get().to(public_files::<S>)))
        .service(web::resource("/noticia/articulo/{slug}").route(web::get().to(view_article_by_slug::<S>)))
        .service(web::resource("/noticia/{category}").route(web::get().to(view_category::<S>)))
        .service(web::resource("/noticia/{category}/{id}").route(web::get().to(view_article::<S>)))
        .service(web::resource("/{file_name}").route(web::get().to(public_files::<S>)));
}

pub async fn server_run(config: Config) -> anyhow::Result<()> {
    let bind_addr = config.server.address.clone();
    let bind_port = config.server.port;
    info!("Reading posts from {}", config.wordpress.api_url);

    let client = WordPressClient::new(&config.wordpress)?;
    let ttl = config.cache.as_ref().map(|c| Duration::seconds(c.ttl_secs));
    match ttl {
        Some(ttl) => info!("Upstream cache enabled, ttl {}s", ttl.num_seconds()),
        None => info!("Upstream cache disabled"),
    }

    let app_state = Arc::new(AppState::new(CachedSource::new(client, ttl), config)?);

    web::HttpServer::new(move || {
        web::App::new()
            .state(app_state.clone())
            .configure(routes::<CachedSource<WordPressClient>>)
    })
        .bind((bind_addr, bind_port))?
        .run()
        .await?;

    Ok(())
}
