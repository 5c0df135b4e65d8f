//! Module for the destination-directory duplicate check and for moving finished files

use std::path::{
	Path,
	PathBuf,
};

use crate::error::IOErrorToError;

/// Options to easily change the max amount of numbered files before giving up
const MAX_NUMBERED_FILES: usize = 30;

/// Find a file in `path` whose file name contains the media `id`
/// Used to detect that a media has already been downloaded by a previous run
pub fn find_downloaded_by_id(path: &Path, id: &str) -> Result<Option<PathBuf>, crate::Error> {
	if !path.is_dir() {
		return Err(crate::Error::not_a_directory(
			"Path for finding downloaded files is not existing or a directory!",
			path,
		));
	}

	for entry in path.read_dir().attach_path_err(path)?.flatten() {
		let entry_path = entry.path();

		if !entry_path.is_file() {
			continue;
		}

		if entry.file_name().to_string_lossy().contains(id) {
			return Ok(Some(entry_path));
		}
	}

	return Ok(None);
}

/// Check output path of the combined "dir_path" and "filename"
/// if it exists, append up to "30" to it
/// if the output path still exists after "30", returns [None]
fn try_gen_final_path(dir_path: &Path, filename: &Path) -> Option<PathBuf> {
	let mut to_path = dir_path.join(filename);

	if to_path.exists() {
		warn!(
			"Initial \"to\" path already exists, trying to find a solution, file: \"{}\"",
			filename.display()
		);
		// ensure it does not run infinitely
		let mut i = 0;

		let Some(file_base) = filename.file_stem() else {
			error!("File did not have a file_stem!");
			return None;
		};
		let ext = filename.extension();

		while to_path.exists() && i < MAX_NUMBERED_FILES {
			i += 1;

			let name = {
				let mut name = file_base.to_owned();

				name.push(format!(" {}", i));

				if let Some(ext) = ext {
					// having to manually push "." because not "set_extension" exists for "OsString"
					name.push(".");
					name.push(ext);
				}

				name
			};

			to_path = dir_path.join(name);
		}

		if !to_path.exists() && i >= MAX_NUMBERED_FILES {
			error!(
				"Not moving file, because it already exists, and also {} more combinations! File: \"{}\"",
				MAX_NUMBERED_FILES,
				filename.display()
			);

			return None;
		}
	}

	return Some(to_path);
}

/// Move all files in `tmp_path` that belong to the media `id` into `out_path`
/// Belonging files are matched via the `"- <id>"` marker the output template produces
/// Returns the final paths of all moved files
pub fn move_finished_files(tmp_path: &Path, out_path: &Path, id: &str) -> Result<Vec<PathBuf>, crate::Error> {
	if !tmp_path.is_dir() {
		return Err(crate::Error::not_a_directory(
			"Path to move finished files from is not existing or a directory!",
			tmp_path,
		));
	}

	std::fs::create_dir_all(out_path).attach_path_err(out_path)?;

	let marker = format!("- {}", id);
	let mut moved: Vec<PathBuf> = Vec::new();

	for entry in tmp_path.read_dir().attach_path_err(tmp_path)?.flatten() {
		let from_path = entry.path();

		if !from_path.is_file() {
			continue;
		}

		let file_name = entry.file_name();

		// also matches extra files of the same media, like subtitles and thumbnails
		if !file_name.to_string_lossy().contains(&marker) {
			continue;
		}

		let Some(to_path) = try_gen_final_path(out_path, Path::new(&file_name)) else {
			continue; // file stays in tmp and will be found again by the next run
		};

		trace!(
			"Copying file \"{}\" to \"{}\"",
			from_path.to_string_lossy(),
			to_path.to_string_lossy()
		);
		// copy has to be used, because it cannot be ensured the "out_path" is on the same file-system
		// and a "move"(mv) function does not exist in standard rust
		std::fs::copy(&from_path, &to_path).attach_path_err(&from_path)?;

		trace!("Removing file \"{}\"", from_path.to_string_lossy());
		// remove the original file, because copy was used
		std::fs::remove_file(&from_path).attach_path_err(&from_path)?;

		moved.push(to_path);
	}

	debug!("Moved {} files for media \"{}\"", moved.len(), id);

	return Ok(moved);
}

#[cfg(test)]
mod test {
	use super::*;
	use std::fs::File;
	use tempfile::{
		Builder as TempBuilder,
		TempDir,
	};

	fn create_tmp_dir() -> (PathBuf, TempDir) {
		let testdir = TempBuilder::new()
			.prefix("ytfetch-test-move_finished-")
			.tempdir()
			.expect("Expected a temp dir to be created");

		return (testdir.as_ref().to_owned(), testdir);
	}

	mod find_downloaded_by_id {
		use super::*;

		#[test]
		fn test_not_a_directory() {
			let (dir, _tempdir) = create_tmp_dir();

			assert!(find_downloaded_by_id(&dir.join("does_not_exist"), "someid").is_err());
		}

		#[test]
		fn test_found_and_not_found() {
			let (dir, _tempdir) = create_tmp_dir();

			File::create(dir.join("Some Title - abc123DEF45.mkv")).unwrap();
			File::create(dir.join("Another Title - otherid0000.mp3")).unwrap();

			assert_eq!(
				Some(dir.join("Some Title - abc123DEF45.mkv")),
				find_downloaded_by_id(&dir, "abc123DEF45").unwrap()
			);

			assert_eq!(None, find_downloaded_by_id(&dir, "unknownid").unwrap());
		}

		#[test]
		fn test_directories_are_ignored() {
			let (dir, _tempdir) = create_tmp_dir();

			std::fs::create_dir_all(dir.join("Some Title - abc123DEF45")).unwrap();

			assert_eq!(None, find_downloaded_by_id(&dir, "abc123DEF45").unwrap());
		}
	}

	mod try_gen_final_path {
		use super::*;

		#[test]
		fn test_no_rename() {
			let (dir, _tempdir) = create_tmp_dir();

			let gen_path = try_gen_final_path(&dir, Path::new("hello.mkv")).unwrap();
			assert_eq!(dir.join("hello.mkv"), gen_path);
		}

		#[test]
		fn test_rename_simple() {
			let (dir, _tempdir) = create_tmp_dir();

			File::create(dir.join("hello.mkv")).unwrap();

			let gen_path = try_gen_final_path(&dir, Path::new("hello.mkv")).unwrap();
			assert_eq!(dir.join("hello 1.mkv"), gen_path);
		}

		#[test]
		fn test_gives_up_after_30() {
			let (dir, _tempdir) = create_tmp_dir();

			File::create(dir.join("hello.mkv")).unwrap();
			for i in 1..=30 {
				File::create(dir.join(format!("hello {}.mkv", i))).unwrap();
			}

			assert_eq!(None, try_gen_final_path(&dir, Path::new("hello.mkv")));
		}
	}

	mod move_finished_files {
		use super::*;

		#[test]
		fn test_moves_only_matching() {
			let (dir, _tempdir) = create_tmp_dir();

			let tmp_dir = dir.join("tmp");
			let out_dir = dir.join("out");
			std::fs::create_dir_all(&tmp_dir).unwrap();

			File::create(tmp_dir.join("Some Title - abc123DEF45.mkv")).unwrap();
			File::create(tmp_dir.join("Some Title - abc123DEF45.en.vtt")).unwrap();
			File::create(tmp_dir.join("Other Title - otherid0000.mkv")).unwrap();

			let mut moved = move_finished_files(&tmp_dir, &out_dir, "abc123DEF45").unwrap();
			moved.sort();

			assert_eq!(
				vec![
					out_dir.join("Some Title - abc123DEF45.en.vtt"),
					out_dir.join("Some Title - abc123DEF45.mkv"),
				],
				moved
			);

			// the moved files only exist in the output directory
			assert!(out_dir.join("Some Title - abc123DEF45.mkv").exists());
			assert!(!tmp_dir.join("Some Title - abc123DEF45.mkv").exists());

			// non-matching files stay in the temporary directory
			assert!(tmp_dir.join("Other Title - otherid0000.mkv").exists());
			assert!(!out_dir.join("Other Title - otherid0000.mkv").exists());
		}

		#[test]
		fn test_collision_gets_numbered() {
			let (dir, _tempdir) = create_tmp_dir();

			let tmp_dir = dir.join("tmp");
			let out_dir = dir.join("out");
			std::fs::create_dir_all(&tmp_dir).unwrap();
			std::fs::create_dir_all(&out_dir).unwrap();

			File::create(tmp_dir.join("Some Title - abc123DEF45.mkv")).unwrap();
			File::create(out_dir.join("Some Title - abc123DEF45.mkv")).unwrap();

			let moved = move_finished_files(&tmp_dir, &out_dir, "abc123DEF45").unwrap();

			assert_eq!(vec![out_dir.join("Some Title - abc123DEF45 1.mkv")], moved);
			assert!(out_dir.join("Some Title - abc123DEF45 1.mkv").exists());
		}

		#[test]
		fn test_missing_tmp_dir_errors() {
			let (dir, _tempdir) = create_tmp_dir();

			assert!(move_finished_files(&dir.join("does_not_exist"), &dir.join("out"), "someid").is_err());
		}
	}
}
