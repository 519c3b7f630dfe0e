use std::env;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

fn main() {
    let out_dir = env::var("OUT_DIR").unwrap();
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("models.rs");

    let mut code = String::new();
    code.push_str("/// Embedded registry documents, sorted by file name\n");
    code.push_str("pub static REGISTRY_DOCUMENTS: &[(&str, &str)] = &[\n");

    let models_dir = Path::new(&manifest_dir).join("models");

    if models_dir.exists() {
        let mut documents: Vec<_> = WalkDir::new(&models_dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .extension()
                    .map_or(false, |ext| ext == "yaml" || ext == "yml")
            })
            .map(|e| e.into_path())
            .collect();
        documents.sort();

        for path in documents {
            let relative_path = path.strip_prefix(&models_dir).unwrap();
            let name = relative_path.to_string_lossy();
            code.push_str(&format!(
                "    ({:?}, include_str!({:?})),\n",
                name,
                path.to_string_lossy()
            ));
        }
    }

    code.push_str("];\n");

    fs::write(&dest_path, code).unwrap();

    println!("cargo:rerun-if-changed=models");
}
