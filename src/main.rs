use clap::{Parser, Subcommand};
use jsse_core::interpreter::{Intrinsic, IteratorRecord, JsFunction, ObjectKind};
use jsse_core::types::WellKnownSymbol;
use jsse_core::{Completion, Config, EngineError, Interpreter, JsValue};
use std::process::ExitCode;
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "jsse-core",
    version,
    about = "Probe the default object layer and iterator protocol"
)]
struct Cli {
    /// Maximum level of diagnostic events written to stderr
    #[arg(long, default_value = "warn", global = true)]
    log_level: Level,

    /// Prototype links a single lookup may follow before a RangeError
    #[arg(long, global = true)]
    max_proto_depth: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print Object.prototype.toString of each value
    Tag {
        #[arg(required = true)]
        values: Vec<String>,
    },
    /// Step a list iterator over the values
    Iterate {
        values: Vec<String>,

        /// Stop after N values and close the iterator with a break
        #[arg(long)]
        close_after: Option<usize>,
    },
}

fn init_tracing(level: Level) {
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr);
    if let Err(err) = builder.try_init() {
        eprintln!("failed to install tracing subscriber: {err}");
    }
}

fn object_of_kind(interp: &mut Interpreter, kind: ObjectKind) -> JsValue {
    let proto = interp.intrinsic(Intrinsic::ObjectPrototype);
    JsValue::Object(interp.create_object_with_proto(kind, proto))
}

/// Builds the value a command-line probe names.
fn parse_probe(interp: &mut Interpreter, text: &str) -> Result<JsValue, EngineError> {
    let value = match text {
        "undefined" => JsValue::Undefined,
        "null" => JsValue::Null,
        "true" => JsValue::Boolean(true),
        "false" => JsValue::Boolean(false),
        "array" => JsValue::Object(interp.create_array(Vec::new())),
        "object" => JsValue::Object(interp.create_object()),
        "function" => interp.create_function(JsFunction::native("probe", 0, |_, _, _| {
            Completion::Normal(JsValue::Undefined)
        })),
        "error" => interp.create_type_error("probe"),
        "date" => object_of_kind(interp, ObjectKind::Date),
        "regexp" => object_of_kind(interp, ObjectKind::RegExp),
        "arguments" => object_of_kind(interp, ObjectKind::Arguments),
        _ => {
            if let Some(tag) = text.strip_prefix("tagged:") {
                let obj = interp.create_object();
                let tagged = interp.create_data_property(
                    &obj,
                    WellKnownSymbol::ToStringTag,
                    JsValue::string(tag),
                );
                interp.completion_into_host(tagged.map(JsValue::Boolean).into())?;
                JsValue::Object(obj)
            } else if let Some(s) = text
                .strip_prefix('"')
                .and_then(|rest| rest.strip_suffix('"'))
            {
                JsValue::string(s)
            } else if let Ok(n) = text.parse::<f64>() {
                JsValue::Number(n)
            } else {
                return Err(EngineError::InvalidProbe(text.to_string()));
            }
        }
    };
    Ok(value)
}

fn render(interp: &mut Interpreter, value: &JsValue) -> Result<String, EngineError> {
    let rendered: Completion = interp.to_string(value).map(JsValue::String).into();
    let rendered = interp.completion_into_host(rendered)?;
    Ok(interp.describe_thrown(&rendered))
}

fn run_tag(interp: &mut Interpreter, values: &[String]) -> Result<(), EngineError> {
    let to_string = interp
        .intrinsic(Intrinsic::ObjProtoToString)
        .map(JsValue::Object)
        .unwrap_or_default();
    for text in values {
        let value = parse_probe(interp, text)?;
        let tagged = interp.call_function(&to_string, &value, &[]);
        let tagged = interp.completion_into_host(tagged)?;
        println!("{}", interp.describe_thrown(&tagged));
    }
    Ok(())
}

fn run_iterate(
    interp: &mut Interpreter,
    values: &[String],
    close_after: Option<usize>,
) -> Result<(), EngineError> {
    let list = values
        .iter()
        .map(|text| parse_probe(interp, text))
        .collect::<Result<Vec<_>, _>>()?;
    let mut record: IteratorRecord = interp.create_list_iterator_record(list);
    let mut index = 0;
    loop {
        if close_after == Some(index) {
            let closed = interp.iterator_close(&record, Completion::Break(None, None));
            println!("closed: {}", closed.kind_name());
            return match closed {
                Completion::Break(None, None) => Ok(()),
                other => interp.completion_into_host(other).map(|_| ()),
            };
        }
        let step = interp.iterator_step_value(&mut record);
        let step = interp.completion_into_host(step.map(|v| v.unwrap_or_default()).into());
        if record.done {
            step?;
            println!("done");
            return Ok(());
        }
        let value = step?;
        println!("{index}: {}", render(interp, &value)?);
        index += 1;
    }
}

fn run(cli: Cli) -> Result<(), EngineError> {
    let mut config = Config::default();
    if let Some(depth) = cli.max_proto_depth {
        config = config.with_max_prototype_chain_depth(depth);
    }
    let mut interp = Interpreter::with_config(config)?;
    match cli.command {
        Command::Tag { values } => run_tag(&mut interp, &values),
        Command::Iterate {
            values,
            close_after,
        } => run_iterate(&mut interp, &values, close_after),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_level);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(1)
        }
    }
}
