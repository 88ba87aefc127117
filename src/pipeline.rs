use super::*;

pub(crate) struct Pipeline<'a> {
  context: Context<'a>,
  stages: Vec<Box<dyn Stage + 'a>>,
}

impl<'a> Pipeline<'a> {
  fn add_stage(&mut self, stage: Box<dyn Stage + 'a>) {
    self.stages.push(stage);
  }

  pub(crate) fn new(context: Context<'a>) -> Self {
    Self {
      context,
      stages: Vec::new(),
    }
  }

  pub(crate) fn run(mut self) -> Result<Context<'a>> {
    for stage in &mut self.stages {
      let before = self.context.html().to_owned();

      stage.run(&mut self.context)?;

      if self.context.html() != before {
        debug!("{} fixed", stage.defect());
        self.context.record(stage.defect());
      }
    }

    Ok(self.context)
  }

  pub(crate) fn with_default_stages(context: Context<'a>) -> Self {
    let options = context.options();

    let mut pipeline = Self::new(context);

    for defect in Defect::ALL {
      if options.enables(defect) {
        pipeline.add_stage(stage::for_defect(defect));
      }
    }

    pipeline
  }
}
