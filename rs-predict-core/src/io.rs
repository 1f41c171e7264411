use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

/// Reads a text file and returns all its lines as a `Vec<String>`.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n`
pub fn read_file<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents.lines().map(str::to_owned).collect())
}

/// Builds the path of a file derived from `input_path` by swapping its extension.
///
/// Example:
/// `data/english.dat` + `"bin"` → `data/english.bin`
pub fn build_output_path<P: AsRef<Path>>(input_path: P, output_extension: &str) -> io::Result<PathBuf> {
	let input_path = input_path.as_ref();

	let parent = input_path.parent().unwrap_or_else(|| Path::new("."));
	let file_stem = input_path
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Input path has no filename"))?;

	let mut output = PathBuf::from(parent);
	output.push(file_stem);
	output.set_extension(output_extension);

	Ok(output)
}

/// Extracts the base filename without extension, used as model name.
///
/// Examples:
/// - `"./data/english.dat"` → `"english"`
/// - `"english.dat"` → `"english"`
pub fn get_filename<P: AsRef<Path>>(input_path: P) -> io::Result<String> {
	let stem = input_path
		.as_ref()
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Path has no filename"))?;

	Ok(stem.to_string_lossy().to_string())
}

/// Normalize a folder path.
///
/// - `"."` or `"./"` resolves to the current working directory
/// - Other paths are returned as-is (not canonicalized)
pub fn normalize_folder(input: &str) -> PathBuf {
	if input == "." || input == "./" {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		PathBuf::from(input)
	}
}

/// Lists all files with a given extension in a directory, sorted by name.
///
/// Returns file names only (no paths).
pub fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<String>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();

		if path.is_file() && path.extension() == Some(std::ffi::OsStr::new(extension)) {
			if let Some(name) = path.file_name() {
				files.push(name.to_string_lossy().to_string());
			}
		}
	}
	files.sort();

	Ok(files)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_build_output_path() {
		let path = build_output_path("data/english.dat", "bin").unwrap();
		assert_eq!(path, PathBuf::from("data/english.bin"));
	}

	#[test]
	fn test_get_filename() {
		assert_eq!(get_filename("./data/english.dat").unwrap(), "english");
		assert_eq!(get_filename("english.dat").unwrap(), "english");
	}

	#[test]
	fn test_list_files_filters_extension() {
		let dir = env::temp_dir().join(format!("rs-predict-io-{}", std::process::id()));
		fs::create_dir_all(&dir).unwrap();
		fs::write(dir.join("b.dat"), "").unwrap();
		fs::write(dir.join("a.dat"), "").unwrap();
		fs::write(dir.join("a.bin"), "").unwrap();

		assert_eq!(list_files(&dir, "dat").unwrap(), ["a.dat", "b.dat"]);

		fs::remove_dir_all(&dir).unwrap();
	}
}
