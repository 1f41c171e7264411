use rs_predict_core::io::{get_filename, list_files, normalize_folder};
use rs_predict_core::model::language_model::LanguageModel;
use rs_predict_core::model::predict_options::PredictOptions;
use rs_predict_core::model::unigram_model::UnigramModel;
use rs_predict_core::text::tokenize_context;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Learn every corpus of the "data" directory (.dat files, one sentence per line)
    // and merge them into one model. A .bin cache is written next to each corpus
    // and loaded instead on the next run.
    let folder = normalize_folder("./data");
    let mut model = UnigramModel::new();
    if folder.is_dir() {
        for file in list_files(&folder, "dat")? {
            let corpus = UnigramModel::from_corpus(folder.join(&file))?;
            println!("{}: {} words", get_filename(&file)?, corpus.num_word_types());
            model.merge(&corpus)?;
        }
    }

    // Also learn from text typed "live", like an auto-learning keyboard would
    model.learn_text("The quick brown fox jumps over the lazy dog", true)?;

    // Default options: control words filtered, candidates pre-sorted by weight
    let options = PredictOptions::default();

    for text in ["The qu", "the ", "Over the l", "jumps ov"] {
        // The context is the current sentence; its last token is the word being typed
        let context = tokenize_context(text);
        let predictions = model.predict(&context, Some(5), &options);
        println!("{:?} -> {:?}", text, predictions.iter().map(|p| &p.word).collect::<Vec<_>>());
    }

    // Case- and accent-insensitive matching
    let options = PredictOptions {
        case_insensitive: true,
        accent_insensitive: true,
        ..PredictOptions::default()
    };
    for prediction in model.predict(&["THE"], Some(5), &options) {
        println!("THE -> {} ({:.4})", prediction.word, prediction.probability);
    }

    // Conflicting capitalization filters are refused
    let conflicting = PredictOptions {
        ignore_capitalized: true,
        ignore_non_capitalized: true,
        ..PredictOptions::default()
    };
    match conflicting.validate() {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("Invalid options: {e}"),
    }

    // Probability of single words; unknown words get the <unk> probability
    for ngram in [["the", "fox"], ["the", "unseeable_word"]] {
        println!("P({} | {}) = {:.6}", ngram[1], ngram[0], model.get_probability(&ngram));
    }

    // Known words, prefixes of known words, unknown words
    for info in model.lookup_text("qui quick quixotic") {
        println!("{}: exact={} partial={}", info.word, info.exact_match, info.partial_match);
    }

    Ok(())
}
