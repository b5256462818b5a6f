mod cli;

use yamlconf::parser::{EncodeOptions, HclParser, Parser, YamlParser};
use yamlconf::registry::{MemoryRegistry, Registry};
use yamlconf::{ResolveOptions, Value, YamlConf};

fn main() {
    use clap::Parser;
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("YAMLCONF_LOG"))
        .with_writer(std::io::stderr)
        .init();

    for new_path in cli.directory.iter() {
        match new_path.canonicalize() {
            Err(e) => {
                eprintln!(
                    "Failed to resolve path for -C/--directory {}\n{}",
                    new_path.display(),
                    e
                );
                std::process::exit(1);
            }
            Ok(cwd) => {
                if let Err(err) = std::env::set_current_dir(&cwd) {
                    eprintln!("Failed to set work directory to {}\n{}", cwd.display(), err,);
                    std::process::exit(1);
                }

                tracing::info!(directory=%cwd.display(), "Changed working directory");
            }
        }
    }

    let command_result = match cli.command {
        cli::Command::Load(load_cli) => with_format(load_cli.input.format, |conf| load(conf, &load_cli)),
        cli::Command::Save(save_cli) => with_format(save_cli.input.format, |conf| save(conf, &save_cli)),
        cli::Command::Call(call_cli) => with_format(call_cli.format, |conf| call(conf, &call_cli)),
    };

    if let Err(e) = command_result {
        for error in e.chain() {
            eprintln!("{error}")
        }
        std::process::exit(1);
    }
}

/// Run `command` with the parser matching `format`
fn with_format(
    format: cli::InputFormat,
    command: impl FnOnce(&dyn Command) -> anyhow::Result<()>,
) -> anyhow::Result<()> {
    match format {
        cli::InputFormat::Yaml => command(&YamlConf::with_parser(YamlParser)),
        cli::InputFormat::Hcl => command(&YamlConf::with_parser(HclParser)),
    }
}

/// The parts of [YamlConf] the commands need, independent of the parser type
trait Command {
    fn load(
        &self,
        input: &cli::InputArgs,
        registry: &mut dyn Registry,
    ) -> anyhow::Result<Value>;
    fn save(&self, tree: &Value, cli: &cli::SaveCommand) -> anyhow::Result<()>;
    fn dispatch(&self, operation: &str, argument: &str) -> anyhow::Result<Value>;
}

impl<P: Parser + Clone> Command for YamlConf<yamlconf::loader::FsLoader, P> {
    fn load(
        &self,
        input: &cli::InputArgs,
        registry: &mut dyn Registry,
    ) -> anyhow::Result<Value> {
        let options = ResolveOptions {
            max_passes: input.max_passes,
            ..Default::default()
        };
        let conf = YamlConf::with_parser(self.parser().clone()).with_options(options);
        Ok(conf.load_to_namespace(&input.path, &input.namespace, registry)?)
    }

    fn save(&self, tree: &Value, cli: &cli::SaveCommand) -> anyhow::Result<()> {
        let options = EncodeOptions::new(cli.inline, cli.indent, cli.flags);
        self.save_as_document(tree, &cli.destination, &options)?;
        Ok(())
    }

    fn dispatch(&self, operation: &str, argument: &str) -> anyhow::Result<Value> {
        Ok(YamlConf::dispatch(self, operation, argument)?)
    }
}

fn registry_with(definitions: &[(String, String)]) -> MemoryRegistry {
    let mut registry = MemoryRegistry::new();
    for (key, value) in definitions {
        registry.publish(key, Value::from(value.as_str()));
    }
    registry
}

fn load(conf: &dyn Command, cli: &cli::LoadCommand) -> anyhow::Result<()> {
    let mut registry = registry_with(&cli.input.definitions);
    let value = conf.load(&cli.input, &mut registry)?;

    output(&cli.output, &value)
}

fn save(conf: &dyn Command, cli: &cli::SaveCommand) -> anyhow::Result<()> {
    let mut registry = registry_with(&cli.input.definitions);
    let value = conf.load(&cli.input, &mut registry)?;

    conf.save(&value, cli)
}

fn call(conf: &dyn Command, cli: &cli::CallCommand) -> anyhow::Result<()> {
    let value = conf.dispatch(&cli.operation, &cli.argument)?;

    output(&cli.output, &value)
}

fn output(output: &cli::OutputArgs, value: &Value) -> anyhow::Result<()> {
    match output.format {
        cli::OutputFormat::Yaml => serde_yaml::to_writer(std::io::stdout(), value)?,
        cli::OutputFormat::Json => serde_json::to_writer_pretty(std::io::stdout(), value)?,
    };

    Ok(())
}
