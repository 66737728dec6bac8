use std::fs::File;
use std::io;
use std::io::Write;
use std::path::Path;

const CONFIG_SAMPLE: &str = r#"[site]
name = "UG Noticias Mineras"
url = "https://ug-noticias-mineras.vercel.app"
description = "Noticias mineras, sindicales y de San Juan"
default_image = "/logo.png"
default_source = "Fuente: WordPress"

[wordpress]
api_url = "https://public-api.wordpress.com/wp/v2/sites/ugnoticiasmineras.wordpress.com"
user_agent = "Mozilla/5.0 (compatible; UGNoticiasMineras/1.0)"
timeout_secs = 10

# Upstream category ids. Missing entries keep the built-in ids
[categories]
nacionales = 170094
sanjuan = 67720
sindicales = 3865306
opinion = 352
internacionales = 17119

# For the file locations, If you want it to be relative to the executable directory
# use ${exe_dir}/location
[paths]
template_dir = "res/template"
public_dir = "res/public"

[defaults]
page_size = 10
featured_count = 4
home_fetch_size = 50
category_fetch_size = 100
related_fetch_size = 10
related_count = 3
max_page_links = 5

[server]
address = "0.0.0.0"
port = 8001

# Optional. Without it the console logger is used
# [log]
# level = "Info"
# log_to_console = true

# Optional. Keeps upstream answers for a few seconds
# [cache]
# ttl_secs = 60
"#;

pub(crate) fn write_sample_cfg(file_path: &Path) -> io::Result<()> {
    let mut file = File::create(file_path)?;
    file.write_all(CONFIG_SAMPLE.as_bytes())
}
