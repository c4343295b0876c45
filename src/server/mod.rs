mod options;

use std::process::exit;

pub use options::ServerOptions;

use crate::simulgo::prelude::*;

/// A stdin-driven REPL that exercises a full game end to end, without a
/// real transport: both seats are local and every `SUBMIT_MOVE`/`RESIGN`
/// comes from commands typed at the same terminal. Messages the broker
/// produces are printed as JSON lines, one per message, prefixed with the
/// recipient seat.
pub struct Server {
    #[allow(dead_code)]
    config: ServerOptions,
    broker: Option<Broker>,
}

impl Server {
    pub fn new(options: ServerOptions) -> Server {
        Server { config: options, broker: None }
    }

    pub fn run(&mut self) -> Result<()> {
        loop {
            let mut cmdstr = String::new();
            if std::io::stdin().read_line(&mut cmdstr)? == 0 {
                return Ok(());
            }

            let args: Vec<&str> = cmdstr.split_whitespace().filter(|s| !s.is_empty()).collect();
            let cmd = *args.first().unwrap_or(&"");

            self.apply(cmd, &args[1..])?;
        }
    }

    fn apply(&mut self, cmd: &str, args: &[&str]) -> Result<()> {
        let result = match cmd {
            "" => Ok(()),
            "newgame" => self.new_game(args),
            "submit" => self.submit(args),
            "pass" => self.pass(args),
            "resign" => self.resign(args),
            "chat" => self.chat(args),
            "tick" => self.tick(args),
            "show" => self.show(),
            "score" => self.score(),
            "quit" => exit(0),
            _ => Err(anyhow!("unrecognized command {cmd}")),
        };

        match result {
            Ok(_) => {
                log::debug!("command completed successfully: {cmd} {}", args.join(" "));
                self.ok()
            }
            Err(err) => {
                log::warn!("encountered recoverable error:\n{err}");
                self.err(&err)
            }
        }
    }

    fn new_game(&mut self, args: &[&str]) -> Result<()> {
        let mut settings = self.config.game_settings();
        if let Some(size) = args.first() {
            settings.board_size = size.parse()?;
        }
        if let Some(base) = args.get(1) {
            settings.base_time_ms = base.parse::<i64>()? * 1000;
        }

        let mut broker = Broker::new(settings)?;
        attach_printer(&mut broker, Color::Black);
        attach_printer(&mut broker, Color::White);
        broker.join().map_err(|m| anyhow!("{m:?}"))?;
        broker.join().map_err(|m| anyhow!("{m:?}"))?;
        self.broker = Some(broker);
        Ok(())
    }

    fn submit(&mut self, args: &[&str]) -> Result<()> {
        let broker = self.ensure_started()?;
        let color = Color::parse(args.first().copied().unwrap_or(""))?;
        let mv = match args.get(1).copied() {
            Some("pass") | None => Move::Pass,
            Some(x) => {
                let y = args.get(2).ok_or_else(|| anyhow!("missing y coordinate"))?;
                Move::Place(Pos::new(x.parse()?, y.parse()?))
            }
        };
        broker.submit_move(color, mv);
        Ok(())
    }

    fn pass(&mut self, args: &[&str]) -> Result<()> {
        let broker = self.ensure_started()?;
        let color = Color::parse(args.first().copied().unwrap_or(""))?;
        broker.submit_move(color, Move::Pass);
        Ok(())
    }

    fn resign(&mut self, args: &[&str]) -> Result<()> {
        let broker = self.ensure_started()?;
        let color = Color::parse(args.first().copied().unwrap_or(""))?;
        broker.resign(color);
        Ok(())
    }

    fn chat(&mut self, args: &[&str]) -> Result<()> {
        let broker = self.ensure_started()?;
        let color = Color::parse(args.first().copied().unwrap_or(""))?;
        broker.chat(color, args[1..].join(" "));
        Ok(())
    }

    fn tick(&mut self, args: &[&str]) -> Result<()> {
        let broker = self.ensure_started()?;
        let elapsed = args.first().ok_or_else(|| anyhow!("missing elapsed ms"))?.parse()?;
        broker.tick(elapsed);
        Ok(())
    }

    fn show(&mut self) -> Result<()> {
        let broker = self.ensure_started()?;
        println!("{}", broker.engine().board().pretty());
        Ok(())
    }

    fn score(&mut self) -> Result<()> {
        let broker = self.ensure_started()?;
        let scoring = score(broker.engine().board());
        println!(
            "black {:.1} white {:.1} winner {:?}",
            scoring.black_score, scoring.white_score, scoring.winner
        );
        Ok(())
    }

    fn ensure_started(&mut self) -> Result<&mut Broker> {
        self.broker.as_mut().ok_or_else(|| anyhow!("no game in progress"))
    }

    fn err(&self, err: &Error) -> Result<()> {
        println!("err\n{err}");
        self.ok()
    }

    fn ok(&self) -> Result<()> {
        println!("ok");
        Ok(())
    }
}

fn attach_printer(broker: &mut Broker, color: Color) {
    let seat = color.notate();
    broker.channel(color).attach_listener(move |msg| {
        if let Ok(json) = serde_json::to_string(&msg) {
            println!("{seat}: {json}");
        }
    });
}
