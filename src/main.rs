use image::error::ImageError;

use log::{error, info};

use quadtree_approx::{BuildError, Outline, Quadtree};

use std::fs::File;

use std::io::Write;

/// Helper function for `main`.
fn error_exit(msg: &str, code: i32) -> ! {
	error!("{}", msg);
	std::process::exit(code)
}

/// Parses an `R,G,B` triple.
fn parse_color(s: &str) -> Option<image::Rgb<u8>> {
	let parts = s.split(',')
		.map(|p| p.trim().parse::<u8>().ok())
		.collect::<Option<Vec<_>>>()?;
	match parts.as_slice() {
		[r, g, b] => Some(image::Rgb([*r, *g, *b])),
		_ => None
	}
}

/// `clap`-based CLI for approximating images with quadtrees.
///
/// May exit process with status code if there are errors:
///
/// 1: `clap` error
///
/// 2: invalid arguments
///
/// 3: file I/O issues
///
/// 4: invalid image data
///
/// 5: computation limits exceeded
///
/// 10: other, potentially unknown error
fn main() {
	let clap_matches = clap::App::new("quadtree_approx")
		.version("0.1.0")
		.author("vkcz")
		.about("Approximates an image with flat-colored regions found by quadtree subdivision.")
		.arg_from_usage("-t, --threshold=[N] 'Error threshold; lower values give finer regions; defaults to 10'")
		.arg_from_usage("-m, --min-size=[N] 'Regions are not split into halves this small or smaller; defaults to 1'")
		.arg_from_usage("-o, --outline=[N] 'Thickness of region outlines in pixels; defaults to 0 (none)'")
		.arg_from_usage("-c, --outline-color=[RGB] 'Outline color as R,G,B; defaults to 255,0,0'")
		.arg_from_usage("-s, --shape=[FILE] 'Also write the partition shape to FILE'")
		.arg_from_usage("-v, --verbose 'Print debug information'")
		.arg_from_usage("<INPUT> 'Path to input image'")
		.arg_from_usage("[OUTPUT] 'Path to output image; defaults to INPUT with a modified name and extension'")
		.get_matches();

	env_logger::Builder::from_env(
		env_logger::Env::default()
			.default_filter_or(if clap_matches.is_present("verbose") { "debug" } else { "info" }),
	)
	.format_timestamp(None)
	.init();

	let (threshold, min_size, outline) = (
		match clap_matches.value_of("threshold").unwrap_or("10").parse::<f64>() {
			Ok(n) => n,
			Err(_) => error_exit("Non-numeric value for threshold", 2)
		},
		match clap_matches.value_of("min-size").unwrap_or("1").parse::<u32>() {
			Ok(n) => n,
			Err(_) => error_exit("Minimum size must be a non-negative integer", 2)
		},
		Outline {
			thickness: match clap_matches.value_of("outline").unwrap_or("0").parse() {
				Ok(n) => n,
				Err(_) => error_exit("Outline thickness must be a non-negative integer", 2)
			},
			color: match parse_color(clap_matches.value_of("outline-color").unwrap_or("255,0,0")) {
				Some(c) => c,
				None => error_exit("Outline color must be given as R,G,B", 2)
			}
		}
	);

	// `<INPUT>` is required, so clap has already rejected a missing one.
	let input_path = clap_matches.value_of("INPUT").unwrap_or_default();
	info!("Input: {}", input_path);
	let source = match image::open(input_path) {
		Ok(i) => i,
		Err(e) => {
			let (msg, code) = match e {
				ImageError::Decoding(_) => ("Invalid image data", 4),
				ImageError::Unsupported(_) => ("Unsupported image format", 4),
				ImageError::Limits(_) => ("Computation limits exceeded", 5),
				ImageError::IoError(_) => ("File not found or could not be read", 3),
				_ => ("An error occurred", 10)
			};
			error_exit(msg, code)
		}
	}.into_rgb();

	let tree = match Quadtree::build(&source, threshold, min_size) {
		Ok(t) => t,
		Err(e @ BuildError::EmptyImage { .. }) => error_exit(&e.to_string(), 4),
		Err(e @ BuildError::InvalidThreshold(_)) => error_exit(&e.to_string(), 2)
	};
	let stats = tree.stats();
	info!(
		"Threshold {}, min size {}: {} regions, minimum region area {} px, depth {}",
		threshold, min_size, stats.leaf_count, stats.min_leaf_area, stats.depth
	);

	if let Some(shape_path) = clap_matches.value_of("shape") {
		let mut out_fh = match File::create(shape_path) {
			Ok(f) => f,
			Err(_) => error_exit("Could not open shape file", 3)
		};
		match out_fh.write_all(&tree.to_shape()) {
			Ok(_) => info!("Shape: {}", shape_path),
			Err(_) => error_exit("Could not write to shape file", 3)
		}
	}

	let default_output = input_path.rsplitn(2, '.').last().unwrap_or(input_path).to_string() + "_qt.png";
	let output_path = clap_matches.value_of("OUTPUT").unwrap_or(&default_output);
	match tree.render(&outline).save(output_path) {
		Ok(_) => info!("Output: {}", output_path),
		Err(_) => error_exit("Could not save output", 3)
	}
}
