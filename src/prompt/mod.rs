//! Prompt rendering.
//!
//! Everything here is a pure function of the profile: the same profile always
//! renders to the same text, which keeps request payloads reproducible.

use crate::models::UserProfile;

/// Render exercises as a comma separated list (empty input renders as "")
pub fn format_exercise_list(exercises: &[String]) -> String {
    exercises.join(", ")
}

/// Greeting shown before the first question, summarising the current routine
pub fn welcome_message(profile: &UserProfile) -> String {
    let workout = &profile.current_workout;
    let mut message = String::new();

    message.push_str("**Here is your current routine**\n");
    message.push_str(&format!("**Format:** {}\n", workout.format));
    for exercise in &workout.exercises {
        message.push_str(&format!("- {}\n", exercise));
    }
    message.push_str("**How can I help you?**\n");

    message
}

/// Render the instruction block sent with the system role
pub fn system_prompt(profile: &UserProfile) -> String {
    let workout = &profile.current_workout;

    format!(
        r#"You are an AI fitness trainer specializing in **time-efficient, effective workouts for busy women**.
Your goal is to create **structured, clear workout plans** that match the app's UI design.

### **Rules for AI Responses**
1. **Concise format** like:
   **Here is your modified routine**
   **Format:** 40s work, 20s rest
   - Exercise 1
   - Exercise 2
   - Exercise 3
   - ...
   **Would you like to use this instead?**

2. **Avoid extra explanations.**
   - No long descriptions.
   - No extra justification.
   - Keep it structured.

### **User Profile**
- **Name**: {name}
- **Age**: {age}
- **Gender**: {gender}
- **Height**: {height}
- **Weight**: {weight}
- **Fitness Level**: {fitness_level}
- **Fitness Goal**: {fitness_goal}
- **Medical History**: {medical_history}
- **Workout Preferences**: {workout_preferences}
- **Menstrual Status**: {menstrual_status}
- **Default Workout Duration**: {duration} minutes

### **Current Workout Plan**
- **Format**: {format}
- **Exercises**: {exercises}

### **Modification Rules**
- If user requests **easier workouts (e.g., on period)** → Provide low-impact exercises.
- If user **wants longer workouts** → Ask if it's a one-time change or permanent.
- If user **mentions injuries**, ask next time: *"How is your knee feeling today?"*
"#,
        name = profile.name,
        age = profile.age,
        gender = profile.gender,
        height = profile.height,
        weight = profile.weight,
        fitness_level = profile.fitness_level,
        fitness_goal = profile.fitness_goal,
        medical_history = profile.medical_history,
        workout_preferences = profile.workout_preferences,
        menstrual_status = profile.menstrual_status,
        duration = profile.default_workout_duration,
        format = workout.format,
        exercises = format_exercise_list(&workout.exercises),
    )
}
