use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::{get, middleware, put, web, App, HttpResponse, HttpServer, Responder};

use serde::Deserialize;
use rs_predict_core::io::{list_files, normalize_folder};
use rs_predict_core::model::language_model::LanguageModel;
use rs_predict_core::model::predict_options::PredictOptions;
use rs_predict_core::model::unigram_model::UnigramModel;
use rs_predict_core::text::tokenize_context;

mod config;

use config::Config;

/// Query parameters of the `/v1/predict` endpoint.
///
/// Unset flags keep their `PredictOptions::default()` value.
#[derive(Deserialize)]
struct PredictParams {
	/// Text left of the cursor.
	context: String,
	limit: Option<usize>,
	filter_control_words: Option<bool>,
	sort_by_weight: Option<bool>,
	normalize: Option<bool>,
	skip_sort: Option<bool>,
	include_control_words: Option<bool>,
	case_insensitive: Option<bool>,
	accent_insensitive: Option<bool>,
	ignore_capitalized: Option<bool>,
	ignore_non_capitalized: Option<bool>,
}

impl PredictParams {
	fn options(&self) -> PredictOptions {
		let defaults = PredictOptions::default();
		PredictOptions {
			filter_control_words: self.filter_control_words.unwrap_or(defaults.filter_control_words),
			sort_by_weight: self.sort_by_weight.unwrap_or(defaults.sort_by_weight),
			normalize: self.normalize.unwrap_or(defaults.normalize),
			skip_sort: self.skip_sort.unwrap_or(defaults.skip_sort),
			include_control_words: self.include_control_words.unwrap_or(defaults.include_control_words),
			case_insensitive: self.case_insensitive.unwrap_or(defaults.case_insensitive),
			accent_insensitive: self.accent_insensitive.unwrap_or(defaults.accent_insensitive),
			ignore_capitalized: self.ignore_capitalized.unwrap_or(defaults.ignore_capitalized),
			ignore_non_capitalized: self.ignore_non_capitalized.unwrap_or(defaults.ignore_non_capitalized),
		}
	}
}

#[derive(Deserialize)]
struct NgramQuery {
	/// Comma separated words, the last one is scored.
	ngram: String,
}

#[derive(Deserialize)]
struct TextQuery {
	text: String,
}

#[derive(Deserialize)]
struct ModelQuery {
	names: Option<String>,
}

struct SharedData {
	model: UnigramModel,
	model_names: Vec<String>,
}

impl SharedData {
	fn new() -> Self {
		Self { model: UnigramModel::new(), model_names: Vec::new() }
	}
}

/// HTTP GET endpoint `/v1/predict`
///
/// Tokenizes `context` and returns the ranked completions of its last word
/// as a JSON array of `{word, probability}`.
#[get("/v1/predict")]
async fn get_predict(
	data: web::Data<Mutex<SharedData>>,
	config: web::Data<Config>,
	query: web::Query<PredictParams>,
) -> impl Responder {
	let options = query.options();
	if let Err(e) = options.validate() {
		return HttpResponse::BadRequest().body(e.to_string());
	}

	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let context = tokenize_context(&query.context);
	let limit = query.limit.unwrap_or(config.default_limit);
	HttpResponse::Ok().json(shared_data.model.predict(&context, Some(limit), &options))
}

/// HTTP GET endpoint `/v1/probability`
///
/// Returns the probability of the last word of `ngram` given the others.
#[get("/v1/probability")]
async fn get_probability(data: web::Data<Mutex<SharedData>>, query: web::Query<NgramQuery>) -> impl Responder {
	let ngram: Vec<&str> = query.ngram.split(',').map(str::trim).collect();

	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	HttpResponse::Ok().json(shared_data.model.get_probability(&ngram))
}

/// HTTP GET endpoint `/v1/lookup`
///
/// Reports, for each word of `text`, whether it is known or a known prefix.
#[get("/v1/lookup")]
async fn get_lookup(data: web::Data<Mutex<SharedData>>, query: web::Query<TextQuery>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	HttpResponse::Ok().json(shared_data.model.lookup_text(&query.text))
}

/// HTTP PUT endpoint `/v1/learn`
///
/// Adds the words of `text` to the loaded model.
#[put("/v1/learn")]
async fn put_learn(data: web::Data<Mutex<SharedData>>, query: web::Query<TextQuery>) -> impl Responder {
	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	match shared_data.model.learn_text(&query.text, true) {
		Ok(count) => HttpResponse::Ok().body(format!("Learned {count} words")),
		Err(e) => HttpResponse::InternalServerError().body(format!("Failed to learn: {e}")),
	}
}

#[get("/v1/models")]
async fn get_models(config: web::Data<Config>) -> impl Responder {
	match list_files(normalize_folder(&config.data_dir), "dat") {
		Ok(files) => HttpResponse::Ok().body(files.join("\n").replace(".dat", "")),
		Err(_) => HttpResponse::InternalServerError().body("Failed to list models"),
	}
}

#[get("/v1/loaded_models")]
async fn get_loaded_models(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	HttpResponse::Ok().body(shared_data.model_names.join("\n"))
}

/// HTTP PUT endpoint `/v1/load_models`
///
/// Replaces the served model by the merge of the named corpora.
#[put("/v1/load_models")]
async fn put_model(
	data: web::Data<Mutex<SharedData>>,
	config: web::Data<Config>,
	query: web::Query<ModelQuery>,
) -> impl Responder {
	let query_names = match &query.names {
		Some(s) if !s.trim().is_empty() => s.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or empty model name"),
	};

	let model_names: Vec<&str> = query_names
		.split(',')
		.map(|s| s.trim())
		.filter(|s| !s.is_empty())
		.collect();

	let folder = normalize_folder(&config.data_dir);
	let mut model = UnigramModel::new();
	for name in &model_names {
		let model_path = folder.join(format!("{name}.dat"));
		let partial_model = match UnigramModel::from_corpus(&model_path) {
			Ok(m) => m,
			Err(e) => return HttpResponse::InternalServerError().body(format!("Failed to load model: {e}")),
		};
		if let Err(e) = model.merge(&partial_model) {
			return HttpResponse::InternalServerError().body(format!("Failed to merge model: {e}"));
		}
	}

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	shared_data.model = model;
	shared_data.model_names = model_names.iter().map(|s| s.to_string()).collect();
	log::info!("serving models: {}", shared_data.model_names.join(", "));

	HttpResponse::Ok().body("Models loaded successfully")
}

fn configure(cfg: &mut web::ServiceConfig) {
	cfg.service(get_predict)
		.service(get_probability)
		.service(get_lookup)
		.service(put_learn)
		.service(get_models)
		.service(put_model)
		.service(get_loaded_models);
}

/// Main entry point for the server.
///
/// Starts with an empty model; corpora are loaded through `/v1/load_models`.
/// Host, port and data folder come from the environment (see `Config`).
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::init();

	let config = Config::new();
	let bind = (config.host.clone(), config.port);
	log::info!("listening on {}:{}, data in {}", bind.0, bind.1, config.data_dir);

	let shared_model = web::Data::new(Mutex::new(SharedData::new()));
	let shared_config = web::Data::new(config);

	HttpServer::new(move || {
		App::new()
			.wrap(middleware::Logger::default())
			.wrap(Cors::permissive())
			.app_data(shared_model.clone())
			.app_data(shared_config.clone())
			.configure(configure)
	})
		.bind(bind)?
		.run()
		.await
}
