use std::{
    env,
    error::Error,
    fs::{self, File},
    io::Write,
    path::PathBuf,
    process,
};

struct ProblemDef {
    /// The code that users see in diagnostics. This should remain stable
    /// between releases so that documentation can refer to it.
    code: String,
    /// The variant name of the problem in the generated enumeration.
    name: String,
    /// A message describing the type of problem.
    message: String,
}

fn read_definitions() -> Result<Vec<ProblemDef>, Box<dyn Error>> {
    println!("cargo:rerun-if-changed=resources/problem-codes.csv");

    let mut src_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    src_path.push("resources");
    src_path.push("problem-codes.csv");

    let src = fs::read_to_string(&src_path)
        .map_err(|e| format!("Unable to read {}: {}", src_path.display(), e))?;

    let mut defs = vec![];
    let mut rdr = csv::Reader::from_reader(src.as_bytes());
    for result in rdr.records() {
        let record = result?;
        let column = |index: usize| {
            record
                .get(index)
                .map(|value| value.trim().to_string())
                .ok_or_else(|| format!("Record {:?} is not valid at column {}", record, index))
        };
        defs.push(ProblemDef {
            code: column(0)?,
            name: column(1)?,
            message: column(2)?,
        });
    }

    Ok(defs)
}

fn create_problems() -> Result<(), Box<dyn Error>> {
    let defs = read_definitions()?;

    let mut out_path = PathBuf::from(env::var("OUT_DIR")?);
    fs::create_dir_all(out_path.clone())
        .map_err(|e| format!("Unable to create output directory: {}", e))?;

    out_path.push("problems.rs");
    let mut out =
        File::create(out_path).map_err(|e| format!("Unable to create 'problems.rs': {}", e))?;

    // The enumeration definition
    out.write_all(b"/// A category of problem that compilation can report.\n")?;
    out.write_all(b"#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]\n")?;
    out.write_all(b"pub enum Problem {\n")?;
    for def in &defs {
        out.write_all(format!("    {},\n", def.name).as_bytes())?;
    }
    out.write_all(b"}\n\n")?;

    out.write_all(b"impl Problem {\n")?;

    out.write_all(b"    /// Returns the code for the particular problem as a string.\n")?;
    out.write_all(b"    pub fn code(&self) -> &'static str {\n")?;
    out.write_all(b"        match self {\n")?;
    for def in &defs {
        out.write_all(
            format!("            Problem::{} => {:?},\n", def.name, def.code).as_bytes(),
        )?;
    }
    out.write_all(b"        }\n")?;
    out.write_all(b"    }\n\n")?;

    out.write_all(b"    /// Returns the message for the particular problem as a string.\n")?;
    out.write_all(b"    /// The message is constant and does not depend on the particular instance of the problem.\n")?;
    out.write_all(b"    pub fn message(&self) -> &'static str {\n")?;
    out.write_all(b"        match self {\n")?;
    for def in &defs {
        out.write_all(
            format!("            Problem::{} => {:?},\n", def.name, def.message).as_bytes(),
        )?;
    }
    out.write_all(b"        }\n")?;
    out.write_all(b"    }\n")?;

    out.write_all(b"}\n")?;

    out.flush()?;

    Ok(())
}

fn main() {
    if let Err(err) = create_problems() {
        println!("problem generating problems.rs: {}", err);
        process::exit(1);
    }
}
