use anyhow::{Context, Result};
use clap::Parser;
use crossbeam_channel::{never, select, unbounded, Receiver, Sender};
use log::{debug, info, log_enabled, Level};
use simple_logger::SimpleLogger;
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use tokio::runtime::Runtime;

use evander_voxel::{
    config::core::ClientConfig,
    console::{Command, HELP},
    net::{
        client::{run_connection, ConnectOptions, NetEvent},
        session::{ConnectionState, SyncSession},
    },
    player::Player,
    world::{
        blocks_data::describe, exposed_faces, generator::TerrainGenerator, visible_blocks,
        BlockId, EditOrigin, WorldEvent, WorldStore,
    },
};

#[derive(Parser, Debug)]
#[command(name = "evander", about = "Headless voxel sandbox client")]
struct Args {
    /// Config file; defaults to the per-user config directory.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Relay address, overriding the config file.
    #[arg(long)]
    server: Option<String>,
    /// Do not connect to the relay at startup.
    #[arg(long, default_value_t = false)]
    offline: bool,
    #[arg(long)]
    log_level: Option<String>,
}

struct App {
    config: ClientConfig,
    world: Arc<WorldStore>,
    world_events: Receiver<WorldEvent>,
    player: Player,
    session: SyncSession,
    runtime: Runtime,
    net_tx: Sender<NetEvent>,
    net_rx: Receiver<NetEvent>,
    redraws: u64,
}

impl App {
    fn new(config: ClientConfig) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .context("Failed to create network runtime")?;

        let generator = Arc::new(TerrainGenerator::new(config.worldgen.clone()));
        let world = Arc::new(WorldStore::new(generator));
        let world_events = world.subscribe();
        let player = Player::new(config.player.spawn_point(), config.player.default_block);

        let created = world.preload_around(player.block_position(), config.render.preload_radius);
        info!("Generated {} chunks around spawn", created);

        let (net_tx, net_rx) = unbounded();
        Ok(Self {
            config,
            world,
            world_events,
            player,
            session: SyncSession::new(),
            runtime,
            net_tx,
            net_rx,
            redraws: 0,
        })
    }

    fn connect(&mut self, delay: bool) {
        if !self.session.begin_connect() {
            println!("Already {:?}", self.session.state());
            return;
        }
        let network = &self.config.network;
        let options = ConnectOptions {
            addr: network.server_addr.clone(),
            delay: if delay {
                network.connect_delay()
            } else {
                Default::default()
            },
            timeout: network.connect_timeout(),
        };
        info!("Connecting to {}", options.addr);
        self.runtime.spawn(run_connection(options, self.net_tx.clone()));
    }

    fn run(&mut self) {
        let console = spawn_stdin_reader();
        let net_events = self.net_rx.clone();
        let world_events = self.world_events.clone();
        let mut stdin_open = true;
        self.redraw();

        loop {
            let commands = if stdin_open { console.clone() } else { never() };
            select! {
                recv(commands) -> line => match line {
                    Ok(line) => {
                        if !self.handle_line(&line) {
                            break;
                        }
                    }
                    Err(_) => {
                        debug!("Console closed");
                        stdin_open = false;
                    }
                },
                recv(net_events) -> event => {
                    if let Ok(event) = event {
                        self.handle_net_event(event);
                    }
                },
                recv(world_events) -> event => {
                    if let Ok(event) = event {
                        self.handle_world_event(&event);
                        for event in world_events.try_iter() {
                            self.handle_world_event(&event);
                        }
                        self.redraw();
                    }
                },
            }

            if !stdin_open && self.session.state() == ConnectionState::Disconnected {
                break;
            }
        }
    }

    fn handle_world_event(&mut self, event: &WorldEvent) {
        self.session.on_world_event(event);
    }

    fn handle_net_event(&mut self, event: NetEvent) {
        let before = self.session.status();
        match event {
            NetEvent::Opened(outbound) => self.session.on_open(outbound, self.player.position()),
            NetEvent::Line(text) => {
                self.session.handle_text(&text, &self.world);
            }
            NetEvent::Closed => self.session.on_closed(),
            NetEvent::Error(reason) => self.session.on_error(&reason),
            NetEvent::ConnectFailed(reason) => self.session.on_connect_failed(&reason),
        }
        if self.session.status() != before {
            println!("[{}]", self.session.status());
        }
    }

    /// Stands in for the renderer: re-enumerates what would be drawn.
    fn redraw(&mut self) {
        self.redraws += 1;
        if log_enabled!(Level::Debug) {
            let visible = visible_blocks(
                &self.world,
                self.player.block_position(),
                self.config.render.render_distance,
            );
            debug!("Redraw #{}: {} visible blocks", self.redraws, visible.len());
        }
    }

    /// Returns false when the client should exit.
    fn handle_line(&mut self, line: &str) -> bool {
        if line.trim().is_empty() {
            return true;
        }
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                return true;
            }
        };

        match command {
            Command::Get(pos) => {
                let block = self.world.get_block(pos);
                println!("{} = {} ({})", pos, describe(block).name, block);
            }
            Command::Set(pos, block) => {
                if self.world.set_block(pos, block, EditOrigin::Local).is_none() {
                    println!("{} is outside the world", pos);
                }
            }
            Command::Mine(pos) => {
                if self.player.mine(&self.world, pos).is_none() {
                    println!("{} is outside the world", pos);
                }
            }
            Command::Place(pos, face) => {
                if self.player.place(&self.world, pos, face.normal()).is_none() {
                    println!("Cannot place against the {:?} face of {}", face, pos);
                }
            }
            Command::Select(choice) => self.select(&choice),
            Command::Exposed(pos) => {
                let faces = exposed_faces(&self.world, pos);
                if faces.is_empty() {
                    println!("{} is buried", pos);
                } else {
                    println!("{} exposed on {:?}", pos, faces);
                }
            }
            Command::Visible(radius) => {
                let radius = radius.unwrap_or(self.config.render.render_distance);
                let visible = visible_blocks(&self.world, self.player.block_position(), radius);
                println!("{} visible blocks within {}", visible.len(), radius);
            }
            Command::Goto(pos) => {
                self.player.set_position(pos);
                self.redraw();
            }
            Command::Status => {
                println!(
                    "{} | players: {} | chunks: {} | selected: {} | position: {}",
                    self.session.status(),
                    self.session
                        .player_count()
                        .map_or_else(|| "-".to_string(), |n| n.to_string()),
                    self.world.loaded_chunk_count(),
                    describe(self.player.selected()).name,
                    self.player.block_position(),
                );
            }
            Command::Connect => self.connect(false),
            Command::Help => println!("{}", HELP),
            Command::Quit => return false,
        }
        true
    }

    fn select(&mut self, choice: &str) {
        let selected = match choice.parse::<u8>() {
            Ok(digit) => self.player.select_hotbar(digit),
            Err(_) => match choice.parse::<BlockId>() {
                Ok(block) => self.player.select(block),
                Err(_) => false,
            },
        };
        if selected {
            println!("Selected {}", describe(self.player.selected()).name);
        } else {
            println!("Cannot select {:?}", choice);
        }
    }
}

fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = unbounded();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => ClientConfig::default_path()?,
    };
    let mut config = ClientConfig::load_or_create(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    if let Some(server) = args.server {
        config.network.server_addr = server;
    }
    if let Some(level) = args.log_level {
        config.log_level = level;
    }
    if args.offline {
        config.network.connect_on_start = false;
    }

    SimpleLogger::new()
        .with_level(config.level_filter()?)
        .env()
        .init()?;
    info!("Starting Evander Voxel client");

    let mut app = App::new(config)?;
    if app.config.network.connect_on_start {
        app.connect(true);
    }
    app.run();
    info!("Bye");
    Ok(())
}
